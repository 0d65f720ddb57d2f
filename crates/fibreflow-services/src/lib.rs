//! Business logic services for FibreFlow billing
//!
//! This crate contains the billing classification engine: given a ticket's
//! attributes, decide whether the work is covered by a project guarantee,
//! covered by an SLA contract, or billable against the fee schedule.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - The classifier takes its repositories and cache as trait capabilities
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `BillingClassifier` - Guarantee/SLA/fee-schedule classification
//! - `fee_resolver` - Pure specificity ranking and cost estimation

pub mod classifier;
pub mod fee_resolver;

pub use classifier::BillingClassifier;
pub use fee_resolver::{estimate_fee, resolve_best_entry, FeeEstimate};

/// Business logic constants
pub mod constants {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Fallback callout fee when no fee schedule entry matches
    pub const DEFAULT_CALLOUT_FEE: Decimal = dec!(500);

    /// Estimated cost above which manual approval is required
    pub const APPROVAL_THRESHOLD: Decimal = dec!(1000);

    /// Days used to prorate a monthly contract fee to a daily equivalent
    pub const SLA_PRORATION_DAYS: i32 = 30;

    /// TTL for cached guarantee/contract lookups in seconds
    pub const LOOKUP_CACHE_TTL: u64 = 60;
}
