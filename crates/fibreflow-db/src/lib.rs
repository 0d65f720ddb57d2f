//! Database layer for FibreFlow billing
//!
//! PostgreSQL-backed repositories for the four billing record types, plus
//! connection pool management.

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::{
    PgContractRepository, PgFeeScheduleRepository, PgGuaranteeRepository, PgSlaConfigRepository,
};
