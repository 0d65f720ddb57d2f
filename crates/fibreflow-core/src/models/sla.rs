//! SLA configuration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named service-level definition referenced by service contracts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaConfig {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Display name (e.g., "Gold 4h response")
    pub name: String,

    /// Target time to first response, in minutes
    pub response_target_minutes: i32,

    /// Target time to resolution, in minutes
    pub resolution_target_minutes: i32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl SlaConfig {
    /// Sanity check on targets: response must not exceed resolution
    pub fn targets_consistent(&self) -> bool {
        self.response_target_minutes > 0
            && self.resolution_target_minutes >= self.response_target_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_consistent() {
        let sla = SlaConfig {
            id: Uuid::new_v4(),
            name: "Gold".to_string(),
            response_target_minutes: 240,
            resolution_target_minutes: 1440,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(sla.targets_consistent());

        let inverted = SlaConfig {
            response_target_minutes: 1440,
            resolution_target_minutes: 240,
            ..sla
        };
        assert!(!inverted.targets_consistent());
    }
}
