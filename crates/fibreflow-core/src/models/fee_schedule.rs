//! Fee schedule model
//!
//! Pricing rules used to estimate billable cost when neither a guarantee nor
//! an SLA contract covers a ticket. Entries are scoped by project, service
//! type, ticket type, and priority; an unset scope field is a wildcard, and
//! more specific entries outrank more general ones.

use crate::models::{TicketPriority, TicketType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Specificity tier of a fee schedule entry
///
/// Ordered most specific first so that `min` over tiers picks the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecificityTier {
    /// Scoped to a particular project
    Project,
    /// Scoped to a service type (but not a project)
    ServiceType,
    /// Scoped to a ticket type only
    TicketType,
    /// Scoped to a priority only
    Priority,
    /// Fully generic catch-all entry
    Global,
}

/// Fee schedule entry entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeScheduleEntry {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Project scope (None = any project)
    pub project_id: Option<Uuid>,

    /// Service type scope (None = any service type)
    pub service_type: Option<String>,

    /// Ticket type scope (None = any ticket type)
    pub ticket_type: Option<TicketType>,

    /// Priority scope (None = any priority)
    pub priority: Option<TicketPriority>,

    /// Base fee for a matching ticket
    pub base_fee: Decimal,

    /// Optional hourly labour rate
    pub hourly_rate: Option<Decimal>,

    /// Optional travel fee
    pub travel_fee: Option<Decimal>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl FeeScheduleEntry {
    /// Check whether this entry matches a request
    ///
    /// Every scope field must either equal the input or be unset.
    pub fn matches(
        &self,
        project_id: Uuid,
        ticket_type: TicketType,
        priority: TicketPriority,
        service_type: Option<&str>,
    ) -> bool {
        if self.project_id.map_or(false, |p| p != project_id) {
            return false;
        }

        if let Some(ref scope) = self.service_type {
            match service_type {
                Some(st) if st == scope => {}
                _ => return false,
            }
        }

        if self.ticket_type.map_or(false, |t| t != ticket_type) {
            return false;
        }

        if self.priority.map_or(false, |p| p != priority) {
            return false;
        }

        true
    }

    /// Classify this entry into its specificity tier
    ///
    /// Project scope dominates, then service type, ticket type, priority,
    /// and finally the fully generic tier.
    pub fn specificity(&self) -> SpecificityTier {
        if self.project_id.is_some() {
            SpecificityTier::Project
        } else if self.service_type.is_some() {
            SpecificityTier::ServiceType
        } else if self.ticket_type.is_some() {
            SpecificityTier::TicketType
        } else if self.priority.is_some() {
            SpecificityTier::Priority
        } else {
            SpecificityTier::Global
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry() -> FeeScheduleEntry {
        FeeScheduleEntry {
            id: Uuid::new_v4(),
            project_id: None,
            service_type: None,
            ticket_type: None,
            priority: None,
            base_fee: dec!(350),
            hourly_rate: None,
            travel_fee: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_global_entry_matches_everything() {
        let e = entry();
        assert!(e.matches(
            Uuid::new_v4(),
            TicketType::Repair,
            TicketPriority::High,
            Some("fibre_repair")
        ));
        assert!(e.matches(
            Uuid::new_v4(),
            TicketType::Incident,
            TicketPriority::Low,
            None
        ));
        assert_eq!(e.specificity(), SpecificityTier::Global);
    }

    #[test]
    fn test_project_scope() {
        let project = Uuid::new_v4();
        let e = FeeScheduleEntry {
            project_id: Some(project),
            ..entry()
        };
        assert!(e.matches(project, TicketType::Repair, TicketPriority::High, None));
        assert!(!e.matches(
            Uuid::new_v4(),
            TicketType::Repair,
            TicketPriority::High,
            None
        ));
        assert_eq!(e.specificity(), SpecificityTier::Project);
    }

    #[test]
    fn test_service_type_scope_requires_input() {
        let e = FeeScheduleEntry {
            service_type: Some("fibre_repair".to_string()),
            ..entry()
        };
        // A service-type-scoped entry cannot match a request without one
        assert!(!e.matches(
            Uuid::new_v4(),
            TicketType::Repair,
            TicketPriority::High,
            None
        ));
        assert!(e.matches(
            Uuid::new_v4(),
            TicketType::Repair,
            TicketPriority::High,
            Some("fibre_repair")
        ));
        assert_eq!(e.specificity(), SpecificityTier::ServiceType);
    }

    #[test]
    fn test_specificity_tier_ordering() {
        assert!(SpecificityTier::Project < SpecificityTier::ServiceType);
        assert!(SpecificityTier::ServiceType < SpecificityTier::TicketType);
        assert!(SpecificityTier::TicketType < SpecificityTier::Priority);
        assert!(SpecificityTier::Priority < SpecificityTier::Global);
    }

    #[test]
    fn test_priority_scope() {
        let e = FeeScheduleEntry {
            priority: Some(TicketPriority::Critical),
            ..entry()
        };
        assert!(e.matches(
            Uuid::new_v4(),
            TicketType::Incident,
            TicketPriority::Critical,
            None
        ));
        assert!(!e.matches(
            Uuid::new_v4(),
            TicketType::Incident,
            TicketPriority::High,
            None
        ));
        assert_eq!(e.specificity(), SpecificityTier::Priority);
    }
}
