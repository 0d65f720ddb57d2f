//! Guarantee model
//!
//! A project-level agreement that certain incidents are serviced at no
//! charge, optionally capped by incident count or expiry, optionally scoped
//! to specific drops (DR numbers) or service types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Guarantee entity
///
/// A guarantee is in force only while it is active, unexpired, and (when an
/// incident limit is set) under its incident count. Coverage is decided per
/// request against the `dr_numbers` and `service_types` lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guarantee {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Project this guarantee belongs to
    pub project_id: Uuid,

    /// Whether the guarantee is administratively active
    pub active: bool,

    /// When the guarantee expires (None = no expiry)
    pub expires_at: Option<DateTime<Utc>>,

    /// Maximum number of covered incidents (None = unlimited)
    pub incident_limit: Option<i32>,

    /// Incidents already serviced under this guarantee
    pub incident_count: i32,

    /// Drop identifiers covered by this guarantee
    pub dr_numbers: Option<Vec<String>>,

    /// Service types covered by this guarantee
    pub service_types: Option<Vec<String>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Guarantee {
    /// Check whether the guarantee is currently in force
    ///
    /// In force means active, unexpired, and under the incident limit.
    /// This says nothing about coverage of a particular drop or service.
    pub fn is_in_force(&self) -> bool {
        if !self.active {
            return false;
        }

        if let Some(expires_at) = self.expires_at {
            if Utc::now() >= expires_at {
                return false;
            }
        }

        match self.incident_limit {
            Some(limit) => self.incident_count < limit,
            None => true,
        }
    }

    /// Check whether a specific drop is covered
    pub fn covers_drop(&self, dr_number: &str) -> bool {
        self.dr_numbers
            .as_ref()
            .map_or(false, |drops| drops.iter().any(|d| d == dr_number))
    }

    /// Check whether a service type is covered
    pub fn covers_service_type(&self, service_type: &str) -> bool {
        self.service_types
            .as_ref()
            .map_or(false, |types| types.iter().any(|t| t == service_type))
    }

    /// Decide whether this guarantee applies to a request
    ///
    /// Drop coverage is checked first, then service type coverage. A
    /// guarantee with neither list populated covers nothing: coverage always
    /// requires a hit in a non-empty list.
    pub fn applies(&self, dr_number: Option<&str>, service_type: Option<&str>) -> bool {
        if let Some(dr) = dr_number {
            if self.covers_drop(dr) {
                return true;
            }
        }

        if let Some(st) = service_type {
            if self.covers_service_type(st) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_guarantee() -> Guarantee {
        Guarantee {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            active: true,
            expires_at: None,
            incident_limit: None,
            incident_count: 0,
            dr_numbers: None,
            service_types: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_in_force_active_unexpired() {
        let g = base_guarantee();
        assert!(g.is_in_force());
    }

    #[test]
    fn test_in_force_inactive() {
        let g = Guarantee {
            active: false,
            ..base_guarantee()
        };
        assert!(!g.is_in_force());
    }

    #[test]
    fn test_in_force_expired() {
        let g = Guarantee {
            expires_at: Some(Utc::now() - Duration::days(1)),
            ..base_guarantee()
        };
        assert!(!g.is_in_force());

        let g = Guarantee {
            expires_at: Some(Utc::now() + Duration::days(30)),
            ..base_guarantee()
        };
        assert!(g.is_in_force());
    }

    #[test]
    fn test_in_force_incident_limit() {
        let g = Guarantee {
            incident_limit: Some(5),
            incident_count: 4,
            ..base_guarantee()
        };
        assert!(g.is_in_force());

        let g = Guarantee {
            incident_limit: Some(5),
            incident_count: 5,
            ..base_guarantee()
        };
        assert!(!g.is_in_force());
    }

    #[test]
    fn test_covers_drop() {
        let g = Guarantee {
            dr_numbers: Some(vec!["DR100".to_string(), "DR101".to_string()]),
            ..base_guarantee()
        };
        assert!(g.covers_drop("DR100"));
        assert!(!g.covers_drop("DR999"));
    }

    #[test]
    fn test_applies_drop_before_service_type() {
        let g = Guarantee {
            dr_numbers: Some(vec!["DR100".to_string()]),
            service_types: Some(vec!["fibre_repair".to_string()]),
            ..base_guarantee()
        };

        assert!(g.applies(Some("DR100"), None));
        assert!(g.applies(None, Some("fibre_repair")));
        assert!(g.applies(Some("DR999"), Some("fibre_repair")));
        assert!(!g.applies(Some("DR999"), Some("copper_repair")));
    }

    #[test]
    fn test_applies_empty_lists_cover_nothing() {
        // No lists at all
        let g = base_guarantee();
        assert!(!g.applies(Some("DR100"), Some("fibre_repair")));
        assert!(!g.applies(None, None));

        // Present but empty lists
        let g = Guarantee {
            dr_numbers: Some(vec![]),
            service_types: Some(vec![]),
            ..base_guarantee()
        };
        assert!(!g.applies(Some("DR100"), Some("fibre_repair")));
    }
}
