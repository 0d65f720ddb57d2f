//! Cache key builders
//!
//! Centralizes the key naming scheme so invalidation and lookup always
//! agree. Keys are namespaced per record type and project.

use uuid::Uuid;

/// Key prefix for the whole billing namespace
const PREFIX: &str = "billing";

/// Key for a project's active guarantee lookup
pub fn active_guarantee(project_id: Uuid) -> String {
    format!("{}:guarantee:{}", PREFIX, project_id)
}

/// Key for a project's active service contract lookup
pub fn active_contract(project_id: Uuid) -> String {
    format!("{}:contract:{}", PREFIX, project_id)
}

/// Key for an SLA config by id
pub fn sla_config(sla_config_id: Uuid) -> String {
    format!("{}:sla:{}", PREFIX, sla_config_id)
}
