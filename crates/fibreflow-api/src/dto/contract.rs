//! Service contract DTOs

use chrono::{DateTime, Utc};
use fibreflow_core::models::ServiceContract;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Contract creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContractCreateRequest {
    /// Project the contract belongs to
    pub project_id: Uuid,

    /// Client display name
    #[validate(length(min = 1, max = 200))]
    pub client_name: Option<String>,

    /// Whether the contract starts active (default: true)
    #[serde(default = "default_active")]
    pub active: bool,

    /// Expiry timestamp (None = evergreen)
    pub expires_at: Option<DateTime<Utc>>,

    /// Monthly fee charged for the contract
    pub monthly_fee: Decimal,

    /// SLA configurations referenced by the contract
    #[serde(default)]
    pub sla_config_ids: Vec<Uuid>,
}

fn default_active() -> bool {
    true
}

impl ContractCreateRequest {
    /// Convert to a ServiceContract entity
    pub fn to_contract(&self) -> ServiceContract {
        ServiceContract {
            id: Uuid::nil(),
            project_id: self.project_id,
            client_name: self.client_name.clone(),
            active: self.active,
            expires_at: self.expires_at,
            monthly_fee: self.monthly_fee,
            sla_config_ids: self.sla_config_ids.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Contract update request (partial)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContractUpdateRequest {
    /// Client display name
    #[validate(length(min = 1, max = 200))]
    pub client_name: Option<String>,

    /// Administrative active flag
    pub active: Option<bool>,

    /// Expiry timestamp
    pub expires_at: Option<DateTime<Utc>>,

    /// Monthly fee
    pub monthly_fee: Option<Decimal>,

    /// SLA configuration references
    pub sla_config_ids: Option<Vec<Uuid>>,
}

/// Contract response
#[derive(Debug, Clone, Serialize)]
pub struct ContractResponse {
    /// Contract ID
    pub id: Uuid,

    /// Project ID
    pub project_id: Uuid,

    /// Client display name
    pub client_name: Option<String>,

    /// Administrative active flag
    pub active: bool,

    /// Expiry timestamp
    pub expires_at: Option<DateTime<Utc>>,

    /// Monthly fee
    pub monthly_fee: Decimal,

    /// SLA configuration references
    pub sla_config_ids: Vec<Uuid>,

    /// Whether the contract is currently in force
    pub in_force: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceContract> for ContractResponse {
    fn from(c: ServiceContract) -> Self {
        let in_force = c.is_in_force();
        Self {
            id: c.id,
            project_id: c.project_id,
            client_name: c.client_name,
            active: c.active,
            expires_at: c.expires_at,
            monthly_fee: c.monthly_fee,
            sla_config_ids: c.sla_config_ids,
            in_force,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_request_to_contract() {
        let sla_id = Uuid::new_v4();
        let req = ContractCreateRequest {
            project_id: Uuid::new_v4(),
            client_name: Some("Velocity Fibre".to_string()),
            active: true,
            expires_at: None,
            monthly_fee: dec!(3000),
            sla_config_ids: vec![sla_id],
        };

        let contract = req.to_contract();
        assert!(contract.is_in_force());
        assert!(contract.references_sla(sla_id));
        assert_eq!(contract.daily_equivalent_fee(30), dec!(100));
    }
}
