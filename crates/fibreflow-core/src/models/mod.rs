//! Domain models for FibreFlow billing

pub mod billing;
pub mod contract;
pub mod fee_schedule;
pub mod guarantee;
pub mod sla;
pub mod ticket;

pub use billing::{BillingClassification, BillingRequest, BillingType, ClassificationSource};
pub use contract::ServiceContract;
pub use fee_schedule::{FeeScheduleEntry, SpecificityTier};
pub use guarantee::Guarantee;
pub use sla::SlaConfig;
pub use ticket::{TicketPriority, TicketType};
