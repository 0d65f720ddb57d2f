//! Billing classification request and result types
//!
//! The classification result is ephemeral: it is handed back to the ticket
//! flow to populate a ticket's billing fields and is never persisted here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::{TicketPriority, TicketType};

/// How a ticket's work is billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingType {
    /// Covered by a project guarantee, free of charge
    Guarantee,
    /// Covered by an active service contract SLA
    Sla,
    /// Billable work priced from the fee schedule
    Billable,
}

impl fmt::Display for BillingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingType::Guarantee => write!(f, "guarantee"),
            BillingType::Sla => write!(f, "sla"),
            BillingType::Billable => write!(f, "billable"),
        }
    }
}

/// Which record justified a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum ClassificationSource {
    /// The guarantee that covered the ticket
    Guarantee(Uuid),
    /// The service contract whose SLA covered the ticket
    Contract(Uuid),
    /// The fee schedule entry that priced the ticket
    FeeSchedule(Uuid),
}

/// Input to the billing classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRequest {
    /// Project the ticket belongs to
    pub project_id: Uuid,

    /// Ticket type
    pub ticket_type: TicketType,

    /// Ticket priority
    pub priority: TicketPriority,

    /// Drop / DR number, if the ticket concerns a specific connection point
    pub dr_number: Option<String>,

    /// Service type, when the ticket flow knows it
    pub service_type: Option<String>,

    /// Explicit SLA config reference supplied by the caller
    pub sla_config_id: Option<Uuid>,
}

/// Output of the billing classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingClassification {
    /// Billing type decided for the ticket
    pub billing_type: BillingType,

    /// Human-readable justification
    pub reason: String,

    /// Estimated cost of the work (None when not estimable)
    pub estimated_cost: Option<Decimal>,

    /// Whether manual approval is required before work proceeds
    pub requires_approval: bool,

    /// Record that justified the classification
    pub source: Option<ClassificationSource>,
}

impl BillingClassification {
    /// A guarantee-covered result: free, no approval needed
    pub fn guarantee(guarantee_id: Uuid, reason: impl Into<String>) -> Self {
        Self {
            billing_type: BillingType::Guarantee,
            reason: reason.into(),
            estimated_cost: Some(Decimal::ZERO),
            requires_approval: false,
            source: Some(ClassificationSource::Guarantee(guarantee_id)),
        }
    }

    /// An SLA-covered result with a prorated daily cost
    pub fn sla(contract_id: Uuid, estimated_cost: Decimal, reason: impl Into<String>) -> Self {
        Self {
            billing_type: BillingType::Sla,
            reason: reason.into(),
            estimated_cost: Some(estimated_cost),
            requires_approval: false,
            source: Some(ClassificationSource::Contract(contract_id)),
        }
    }

    /// A billable result priced from a fee schedule entry (or the fallback)
    pub fn billable(
        source: Option<Uuid>,
        estimated_cost: Decimal,
        requires_approval: bool,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            billing_type: BillingType::Billable,
            reason: reason.into(),
            estimated_cost: Some(estimated_cost),
            requires_approval,
            source: source.map(ClassificationSource::FeeSchedule),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_guarantee_result_is_free() {
        let id = Uuid::new_v4();
        let result = BillingClassification::guarantee(id, "drop DR100 covered");
        assert_eq!(result.billing_type, BillingType::Guarantee);
        assert_eq!(result.estimated_cost, Some(Decimal::ZERO));
        assert!(!result.requires_approval);
        assert_eq!(result.source, Some(ClassificationSource::Guarantee(id)));
    }

    #[test]
    fn test_billable_without_entry_has_no_source() {
        let result = BillingClassification::billable(None, dec!(500), true, "no schedule entry");
        assert_eq!(result.billing_type, BillingType::Billable);
        assert!(result.source.is_none());
        assert!(result.requires_approval);
    }

    #[test]
    fn test_billing_type_display() {
        assert_eq!(BillingType::Guarantee.to_string(), "guarantee");
        assert_eq!(BillingType::Sla.to_string(), "sla");
        assert_eq!(BillingType::Billable.to_string(), "billable");
    }
}
