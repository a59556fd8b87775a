// ── Support tickets ──

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

use super::EntityId;

/// Lifecycle state of a repair ticket. Transitions happen server-side;
/// the client only requests them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Open,
    Repairing,
    Completed,
    Closed,
}

/// A customer support / repair ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: EntityId,
    pub title: String,
    pub device: Option<String>,
    pub customer: Option<String>,
    pub status: TicketStatus,
    pub assignee_id: Option<EntityId>,
    pub store_id: Option<EntityId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Per-status counts across all tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TicketSummary {
    pub open: u32,
    pub repairing: u32,
    pub completed: u32,
    pub closed: u32,
}

impl TicketSummary {
    pub fn total(&self) -> u32 {
        self.open + self.repairing + self.completed + self.closed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_parses_wire_strings() {
        assert_eq!(TicketStatus::from_str("open").unwrap(), TicketStatus::Open);
        assert_eq!(
            TicketStatus::from_str("repairing").unwrap(),
            TicketStatus::Repairing
        );
        assert_eq!(
            TicketStatus::from_str("completed").unwrap(),
            TicketStatus::Completed
        );
    }

    #[test]
    fn summary_totals() {
        let s = TicketSummary {
            open: 1,
            repairing: 2,
            completed: 3,
            closed: 4,
        };
        assert_eq!(s.total(), 10);
    }
}
