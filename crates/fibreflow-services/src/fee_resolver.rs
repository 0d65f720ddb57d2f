//! Fee schedule resolution
//!
//! Pure functions over fee schedule candidates: pick the single best entry
//! by specificity tier and turn it into a cost estimate. No database access
//! happens here, so the ranking rules are testable in isolation.

use fibreflow_core::models::FeeScheduleEntry;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Result of pricing a billable ticket from the fee schedule
#[derive(Debug, Clone, PartialEq)]
pub struct FeeEstimate {
    /// Estimated cost of the work
    pub cost: Decimal,

    /// Whether the estimate needs manual approval
    pub requires_approval: bool,

    /// The entry that produced the estimate (None = fallback fee)
    pub entry_id: Option<Uuid>,
}

/// Pick the most specific entry from a set of matching candidates
///
/// Candidates are assumed to already match the request (the repository's
/// wildcard query guarantees that). Specificity order: project > service
/// type > ticket type > priority > global. Ties within a tier go to the
/// newest entry so re-pricing an entry supersedes older ones.
pub fn resolve_best_entry(mut entries: Vec<FeeScheduleEntry>) -> Option<FeeScheduleEntry> {
    entries.sort_by(|a, b| {
        a.specificity()
            .cmp(&b.specificity())
            .then(b.created_at.cmp(&a.created_at))
    });

    entries.into_iter().next()
}

/// Compute the estimate for a resolved entry (or the fallback)
///
/// Without an entry the default callout fee applies and the estimate always
/// needs approval, forcing manual review of an unpriced case. With an entry
/// the base fee is used and approval is required only above the threshold.
pub fn estimate_fee(
    entry: Option<&FeeScheduleEntry>,
    default_fee: Decimal,
    approval_threshold: Decimal,
) -> FeeEstimate {
    match entry {
        Some(e) => FeeEstimate {
            cost: e.base_fee,
            requires_approval: e.base_fee > approval_threshold,
            entry_id: Some(e.id),
        },
        None => FeeEstimate {
            cost: default_fee,
            requires_approval: true,
            entry_id: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fibreflow_core::models::{TicketPriority, TicketType};
    use rust_decimal_macros::dec;

    fn entry(base_fee: Decimal) -> FeeScheduleEntry {
        FeeScheduleEntry {
            id: Uuid::new_v4(),
            project_id: None,
            service_type: None,
            ticket_type: None,
            priority: None,
            base_fee,
            hourly_rate: None,
            travel_fee: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_project_scope_beats_global() {
        let project = Uuid::new_v4();
        let global = entry(dec!(300));
        let scoped = FeeScheduleEntry {
            project_id: Some(project),
            ..entry(dec!(800))
        };
        let scoped_id = scoped.id;

        let best = resolve_best_entry(vec![global.clone(), scoped]).unwrap();
        assert_eq!(best.id, scoped_id);

        // Order of candidates must not matter
        let scoped = FeeScheduleEntry {
            id: scoped_id,
            project_id: Some(project),
            ..entry(dec!(800))
        };
        let best = resolve_best_entry(vec![scoped, global]).unwrap();
        assert_eq!(best.id, scoped_id);
    }

    #[test]
    fn test_tier_chain() {
        let by_priority = FeeScheduleEntry {
            priority: Some(TicketPriority::Critical),
            ..entry(dec!(100))
        };
        let by_type = FeeScheduleEntry {
            ticket_type: Some(TicketType::Repair),
            ..entry(dec!(200))
        };
        let by_service = FeeScheduleEntry {
            service_type: Some("fibre_repair".to_string()),
            ..entry(dec!(300))
        };

        let best =
            resolve_best_entry(vec![by_priority.clone(), by_type.clone(), by_service.clone()])
                .unwrap();
        assert_eq!(best.id, by_service.id);

        let best = resolve_best_entry(vec![by_priority.clone(), by_type.clone()]).unwrap();
        assert_eq!(best.id, by_type.id);

        let best = resolve_best_entry(vec![by_priority.clone()]).unwrap();
        assert_eq!(best.id, by_priority.id);
    }

    #[test]
    fn test_tie_goes_to_newest() {
        let older = FeeScheduleEntry {
            created_at: Utc::now() - Duration::days(10),
            ..entry(dec!(100))
        };
        let newer = entry(dec!(150));
        let newer_id = newer.id;

        let best = resolve_best_entry(vec![older, newer]).unwrap();
        assert_eq!(best.id, newer_id);
    }

    #[test]
    fn test_empty_candidates() {
        assert!(resolve_best_entry(vec![]).is_none());
    }

    #[test]
    fn test_estimate_with_entry() {
        let e = entry(dec!(750));
        let est = estimate_fee(Some(&e), dec!(500), dec!(1000));
        assert_eq!(est.cost, dec!(750));
        assert!(!est.requires_approval);
        assert_eq!(est.entry_id, Some(e.id));
    }

    #[test]
    fn test_estimate_above_threshold_needs_approval() {
        let e = entry(dec!(1500));
        let est = estimate_fee(Some(&e), dec!(500), dec!(1000));
        assert_eq!(est.cost, dec!(1500));
        assert!(est.requires_approval);
    }

    #[test]
    fn test_estimate_at_threshold_needs_no_approval() {
        let e = entry(dec!(1000));
        let est = estimate_fee(Some(&e), dec!(500), dec!(1000));
        assert!(!est.requires_approval);
    }

    #[test]
    fn test_estimate_fallback() {
        let est = estimate_fee(None, dec!(500), dec!(1000));
        assert_eq!(est.cost, dec!(500));
        assert!(est.requires_approval);
        assert!(est.entry_id.is_none());
    }
}
