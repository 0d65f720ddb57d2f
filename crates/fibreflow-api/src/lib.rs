//! API layer for FibreFlow billing
//!
//! HTTP handlers for billing classification and for administering the
//! records the classifier reads: guarantees, service contracts, SLA
//! configurations, and fee schedule entries.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

// Re-export handler configuration functions
pub use handlers::{
    configure_billing, configure_contracts, configure_fee_schedules, configure_guarantees,
    configure_health, configure_sla_configs,
};
