//! SLA configuration DTOs

use chrono::{DateTime, Utc};
use fibreflow_core::models::SlaConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// SLA config creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SlaConfigCreateRequest {
    /// Display name (e.g., "Gold 4h response")
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    /// Target time to first response, in minutes
    #[validate(range(min = 1))]
    pub response_target_minutes: i32,

    /// Target time to resolution, in minutes
    #[validate(range(min = 1))]
    pub resolution_target_minutes: i32,
}

impl SlaConfigCreateRequest {
    /// Convert to an SlaConfig entity
    pub fn to_sla_config(&self) -> SlaConfig {
        SlaConfig {
            id: Uuid::nil(),
            name: self.name.clone(),
            response_target_minutes: self.response_target_minutes,
            resolution_target_minutes: self.resolution_target_minutes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// SLA config update request (partial)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SlaConfigUpdateRequest {
    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    /// Response target in minutes
    #[validate(range(min = 1))]
    pub response_target_minutes: Option<i32>,

    /// Resolution target in minutes
    #[validate(range(min = 1))]
    pub resolution_target_minutes: Option<i32>,
}

/// SLA config response
#[derive(Debug, Clone, Serialize)]
pub struct SlaConfigResponse {
    /// SLA config ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Response target in minutes
    pub response_target_minutes: i32,

    /// Resolution target in minutes
    pub resolution_target_minutes: i32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<SlaConfig> for SlaConfigResponse {
    fn from(s: SlaConfig) -> Self {
        Self {
            id: s.id,
            name: s.name,
            response_target_minutes: s.response_target_minutes,
            resolution_target_minutes: s.resolution_target_minutes,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let valid = SlaConfigCreateRequest {
            name: "Gold".to_string(),
            response_target_minutes: 240,
            resolution_target_minutes: 1440,
        };
        assert!(valid.validate().is_ok());
        assert!(valid.to_sla_config().targets_consistent());

        let invalid = SlaConfigCreateRequest {
            name: "".to_string(),
            response_target_minutes: 0,
            resolution_target_minutes: 1440,
        };
        assert!(invalid.validate().is_err());
    }
}
