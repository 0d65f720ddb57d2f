//! HTTP request handlers

pub mod billing;
pub mod contract;
pub mod fee_schedule;
pub mod guarantee;
pub mod health;
pub mod sla;

pub use billing::configure as configure_billing;
pub use contract::configure as configure_contracts;
pub use fee_schedule::configure as configure_fee_schedules;
pub use guarantee::configure as configure_guarantees;
pub use health::configure as configure_health;
pub use sla::configure as configure_sla_configs;
