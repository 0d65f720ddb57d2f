//! Billing classification DTOs
//!
//! Request and response types for the classification endpoint. The ticket
//! form calls this on every relevant field change, so the request mirrors
//! the form fields directly.

use fibreflow_core::models::{
    BillingClassification, BillingRequest, BillingType, ClassificationSource, TicketPriority,
    TicketType,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Classification request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClassifyRequest {
    /// Project the ticket belongs to
    pub project_id: Uuid,

    /// Ticket type (defaults to incident)
    #[serde(default)]
    pub ticket_type: TicketType,

    /// Ticket priority (defaults to medium)
    #[serde(default)]
    pub priority: TicketPriority,

    /// Drop / DR number, when the ticket concerns a specific connection
    #[validate(length(min = 1, max = 50, message = "dr_number must not be blank"))]
    pub dr_number: Option<String>,

    /// Service type selected on the ticket form
    #[validate(length(min = 1, max = 100, message = "service_type must not be blank"))]
    pub service_type: Option<String>,

    /// SLA config the caller believes applies
    pub sla_config_id: Option<Uuid>,
}

impl ClassifyRequest {
    /// Convert to the classifier's input type
    pub fn to_billing_request(&self) -> BillingRequest {
        BillingRequest {
            project_id: self.project_id,
            ticket_type: self.ticket_type,
            priority: self.priority,
            dr_number: self.dr_number.clone(),
            service_type: self.service_type.clone(),
            sla_config_id: self.sla_config_id,
        }
    }
}

/// Classification response
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyResponse {
    /// Decided billing type
    pub billing_type: BillingType,

    /// Human-readable justification
    pub reason: String,

    /// Estimated cost
    pub estimated_cost: Option<Decimal>,

    /// Whether manual approval is required
    pub requires_approval: bool,

    /// Record that justified the decision
    pub source: Option<ClassificationSource>,
}

impl From<BillingClassification> for ClassifyResponse {
    fn from(c: BillingClassification) -> Self {
        Self {
            billing_type: c.billing_type,
            reason: c.reason,
            estimated_cost: c.estimated_cost,
            requires_approval: c.requires_approval,
            source: c.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_on_minimal_request() {
        let json = format!(r#"{{"project_id": "{}"}}"#, Uuid::new_v4());
        let req: ClassifyRequest = serde_json::from_str(&json).unwrap();

        assert_eq!(req.ticket_type, TicketType::Incident);
        assert_eq!(req.priority, TicketPriority::Medium);
        assert!(req.dr_number.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_dr_number_fails_validation() {
        let req = ClassifyRequest {
            project_id: Uuid::new_v4(),
            ticket_type: TicketType::Repair,
            priority: TicketPriority::High,
            dr_number: Some("".to_string()),
            service_type: None,
            sla_config_id: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_response_from_classification() {
        let id = Uuid::new_v4();
        let classification = BillingClassification::guarantee(id, "drop covered");
        let resp = ClassifyResponse::from(classification);

        assert_eq!(resp.billing_type, BillingType::Guarantee);
        assert_eq!(resp.source, Some(ClassificationSource::Guarantee(id)));
        assert!(!resp.requires_approval);
    }
}
