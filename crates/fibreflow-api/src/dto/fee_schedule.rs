//! Fee schedule DTOs

use chrono::{DateTime, Utc};
use fibreflow_core::models::{FeeScheduleEntry, SpecificityTier, TicketPriority, TicketType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Fee schedule entry creation request
///
/// Every scope field is optional; an omitted field is a wildcard. An entry
/// with no scope fields at all is the global catch-all.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeeScheduleCreateRequest {
    /// Project scope
    pub project_id: Option<Uuid>,

    /// Service type scope
    #[validate(length(min = 1, max = 100))]
    pub service_type: Option<String>,

    /// Ticket type scope
    pub ticket_type: Option<TicketType>,

    /// Priority scope
    pub priority: Option<TicketPriority>,

    /// Base fee for a matching ticket
    pub base_fee: Decimal,

    /// Optional hourly labour rate
    pub hourly_rate: Option<Decimal>,

    /// Optional travel fee
    pub travel_fee: Option<Decimal>,
}

impl FeeScheduleCreateRequest {
    /// Convert to a FeeScheduleEntry entity
    pub fn to_entry(&self) -> FeeScheduleEntry {
        FeeScheduleEntry {
            id: Uuid::nil(),
            project_id: self.project_id,
            service_type: self.service_type.clone(),
            ticket_type: self.ticket_type,
            priority: self.priority,
            base_fee: self.base_fee,
            hourly_rate: self.hourly_rate,
            travel_fee: self.travel_fee,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Fee schedule entry update request (partial)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeeScheduleUpdateRequest {
    /// Base fee
    pub base_fee: Option<Decimal>,

    /// Hourly labour rate
    pub hourly_rate: Option<Decimal>,

    /// Travel fee
    pub travel_fee: Option<Decimal>,
}

/// Fee schedule entry response
#[derive(Debug, Clone, Serialize)]
pub struct FeeScheduleResponse {
    /// Entry ID
    pub id: Uuid,

    /// Project scope
    pub project_id: Option<Uuid>,

    /// Service type scope
    pub service_type: Option<String>,

    /// Ticket type scope
    pub ticket_type: Option<TicketType>,

    /// Priority scope
    pub priority: Option<TicketPriority>,

    /// Base fee
    pub base_fee: Decimal,

    /// Hourly labour rate
    pub hourly_rate: Option<Decimal>,

    /// Travel fee
    pub travel_fee: Option<Decimal>,

    /// Specificity tier the entry ranks at
    pub specificity: SpecificityTier,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<FeeScheduleEntry> for FeeScheduleResponse {
    fn from(e: FeeScheduleEntry) -> Self {
        let specificity = e.specificity();
        Self {
            id: e.id,
            project_id: e.project_id,
            service_type: e.service_type,
            ticket_type: e.ticket_type,
            priority: e.priority,
            base_fee: e.base_fee,
            hourly_rate: e.hourly_rate,
            travel_fee: e.travel_fee,
            specificity,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
