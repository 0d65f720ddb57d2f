//! Repository implementations for FibreFlow billing

pub mod contract_repo;
pub mod fee_schedule_repo;
pub mod guarantee_repo;
pub mod sla_repo;

pub use contract_repo::PgContractRepository;
pub use fee_schedule_repo::PgFeeScheduleRepository;
pub use guarantee_repo::PgGuaranteeRepository;
pub use sla_repo::PgSlaConfigRepository;
