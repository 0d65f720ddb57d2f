//! Guarantee DTOs
//!
//! Request and response types for guarantee administration endpoints.

use chrono::{DateTime, Utc};
use fibreflow_core::models::Guarantee;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Guarantee creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GuaranteeCreateRequest {
    /// Project the guarantee belongs to
    pub project_id: Uuid,

    /// Whether the guarantee starts active (default: true)
    #[serde(default = "default_active")]
    pub active: bool,

    /// Expiry timestamp (None = no expiry)
    pub expires_at: Option<DateTime<Utc>>,

    /// Maximum number of covered incidents
    #[validate(range(min = 1))]
    pub incident_limit: Option<i32>,

    /// Drops covered by the guarantee
    pub dr_numbers: Option<Vec<String>>,

    /// Service types covered by the guarantee
    pub service_types: Option<Vec<String>>,
}

fn default_active() -> bool {
    true
}

impl GuaranteeCreateRequest {
    /// Convert to a Guarantee entity
    ///
    /// Id and timestamps are placeholders; the database assigns real values
    /// on insert.
    pub fn to_guarantee(&self) -> Guarantee {
        Guarantee {
            id: Uuid::nil(),
            project_id: self.project_id,
            active: self.active,
            expires_at: self.expires_at,
            incident_limit: self.incident_limit,
            incident_count: 0,
            dr_numbers: self.dr_numbers.clone(),
            service_types: self.service_types.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Guarantee update request (partial)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GuaranteeUpdateRequest {
    /// Administrative active flag
    pub active: Option<bool>,

    /// Expiry timestamp
    pub expires_at: Option<DateTime<Utc>>,

    /// Incident limit
    #[validate(range(min = 1))]
    pub incident_limit: Option<i32>,

    /// Incidents already serviced
    #[validate(range(min = 0))]
    pub incident_count: Option<i32>,

    /// Covered drops
    pub dr_numbers: Option<Vec<String>>,

    /// Covered service types
    pub service_types: Option<Vec<String>>,
}

/// Guarantee response
#[derive(Debug, Clone, Serialize)]
pub struct GuaranteeResponse {
    /// Guarantee ID
    pub id: Uuid,

    /// Project ID
    pub project_id: Uuid,

    /// Administrative active flag
    pub active: bool,

    /// Expiry timestamp
    pub expires_at: Option<DateTime<Utc>>,

    /// Incident limit
    pub incident_limit: Option<i32>,

    /// Incidents already serviced
    pub incident_count: i32,

    /// Covered drops
    pub dr_numbers: Option<Vec<String>>,

    /// Covered service types
    pub service_types: Option<Vec<String>>,

    /// Whether the guarantee is currently in force
    pub in_force: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Guarantee> for GuaranteeResponse {
    fn from(g: Guarantee) -> Self {
        let in_force = g.is_in_force();
        Self {
            id: g.id,
            project_id: g.project_id,
            active: g.active,
            expires_at: g.expires_at,
            incident_limit: g.incident_limit,
            incident_count: g.incident_count,
            dr_numbers: g.dr_numbers,
            service_types: g.service_types,
            in_force,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_to_guarantee() {
        let req = GuaranteeCreateRequest {
            project_id: Uuid::new_v4(),
            active: true,
            expires_at: None,
            incident_limit: Some(10),
            dr_numbers: Some(vec!["DR100".to_string()]),
            service_types: None,
        };

        let guarantee = req.to_guarantee();
        assert_eq!(guarantee.incident_count, 0);
        assert!(guarantee.is_in_force());
        assert!(guarantee.covers_drop("DR100"));
    }

    #[test]
    fn test_zero_incident_limit_fails_validation() {
        let req = GuaranteeCreateRequest {
            project_id: Uuid::new_v4(),
            active: true,
            expires_at: None,
            incident_limit: Some(0),
            dr_numbers: None,
            service_types: None,
        };
        assert!(req.validate().is_err());
    }
}
