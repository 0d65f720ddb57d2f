//! Ticket attribute enums
//!
//! The classifier only needs the ticket attributes that scope billing rules:
//! the ticket type and its priority. The full ticket entity is owned by the
//! ticketing module and never touched here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    /// New fibre installation work
    Installation,
    /// Scheduled maintenance
    Maintenance,
    /// Repair of an existing connection
    Repair,
    /// General fault/incident
    #[default]
    Incident,
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketType::Installation => write!(f, "installation"),
            TicketType::Maintenance => write!(f, "maintenance"),
            TicketType::Repair => write!(f, "repair"),
            TicketType::Incident => write!(f, "incident"),
        }
    }
}

impl TicketType {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "installation" => Some(TicketType::Installation),
            "maintenance" => Some(TicketType::Maintenance),
            "repair" => Some(TicketType::Repair),
            "incident" => Some(TicketType::Incident),
            _ => None,
        }
    }
}

/// Ticket priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketPriority::Low => write!(f, "low"),
            TicketPriority::Medium => write!(f, "medium"),
            TicketPriority::High => write!(f, "high"),
            TicketPriority::Critical => write!(f, "critical"),
        }
    }
}

impl TicketPriority {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(TicketPriority::Low),
            "medium" => Some(TicketPriority::Medium),
            "high" => Some(TicketPriority::High),
            "critical" => Some(TicketPriority::Critical),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_type_roundtrip() {
        for t in [
            TicketType::Installation,
            TicketType::Maintenance,
            TicketType::Repair,
            TicketType::Incident,
        ] {
            assert_eq!(TicketType::parse(&t.to_string()), Some(t));
        }
        assert_eq!(TicketType::parse("unknown"), None);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(TicketPriority::Critical > TicketPriority::High);
        assert!(TicketPriority::High > TicketPriority::Medium);
        assert!(TicketPriority::Medium > TicketPriority::Low);
    }

    #[test]
    fn test_priority_parse_case_insensitive() {
        assert_eq!(TicketPriority::parse("HIGH"), Some(TicketPriority::High));
        assert_eq!(TicketPriority::parse("urgent"), None);
    }
}
