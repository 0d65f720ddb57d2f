//! Service contract model
//!
//! Represents an ongoing maintenance contract between a project/client and
//! the operator, paying a monthly fee for SLA-backed support.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service contract entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceContract {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Project this contract belongs to
    pub project_id: Uuid,

    /// Client display name
    pub client_name: Option<String>,

    /// Whether the contract is administratively active
    pub active: bool,

    /// When the contract expires (None = evergreen)
    pub expires_at: Option<DateTime<Utc>>,

    /// Monthly fee charged for the contract
    pub monthly_fee: Decimal,

    /// SLA configurations this contract references
    pub sla_config_ids: Vec<Uuid>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ServiceContract {
    /// Check whether the contract is currently in force
    pub fn is_in_force(&self) -> bool {
        self.active && self.expires_at.map_or(true, |end| Utc::now() < end)
    }

    /// Prorate the monthly fee into a daily equivalent
    ///
    /// Used as the estimated cost of a single SLA-covered callout.
    #[inline]
    pub fn daily_equivalent_fee(&self, proration_days: i32) -> Decimal {
        let days = proration_days.max(1);
        self.monthly_fee / Decimal::from(days)
    }

    /// Check whether this contract references a given SLA config
    pub fn references_sla(&self, sla_config_id: Uuid) -> bool {
        self.sla_config_ids.contains(&sla_config_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn base_contract() -> ServiceContract {
        ServiceContract {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            client_name: Some("Velocity Fibre".to_string()),
            active: true,
            expires_at: None,
            monthly_fee: dec!(3000),
            sla_config_ids: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_in_force() {
        assert!(base_contract().is_in_force());

        let expired = ServiceContract {
            expires_at: Some(Utc::now() - Duration::days(1)),
            ..base_contract()
        };
        assert!(!expired.is_in_force());

        let inactive = ServiceContract {
            active: false,
            ..base_contract()
        };
        assert!(!inactive.is_in_force());
    }

    #[test]
    fn test_daily_equivalent_fee() {
        let contract = base_contract();
        assert_eq!(contract.daily_equivalent_fee(30), dec!(100));

        // Guard against a zero divisor from bad config
        assert_eq!(contract.daily_equivalent_fee(0), dec!(3000));
    }

    #[test]
    fn test_references_sla() {
        let sla_id = Uuid::new_v4();
        let contract = ServiceContract {
            sla_config_ids: vec![sla_id],
            ..base_contract()
        };
        assert!(contract.references_sla(sla_id));
        assert!(!contract.references_sla(Uuid::new_v4()));
    }
}
