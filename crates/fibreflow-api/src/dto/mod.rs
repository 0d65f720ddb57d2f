//! Data Transfer Objects (DTOs) for API requests and responses

pub mod billing;
pub mod common;
pub mod contract;
pub mod fee_schedule;
pub mod guarantee;
pub mod sla;

pub use billing::*;
pub use common::*;
pub use contract::*;
pub use fee_schedule::*;
pub use guarantee::*;
pub use sla::*;
