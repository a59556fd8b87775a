// ── Promotions ──

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::EntityId;

/// A marketing promotion row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Promotion {
    pub id: EntityId,
    pub title: String,
    pub body: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl Promotion {
    /// Whether the promotion is active and inside its date window.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        let started = self.starts_at.is_none_or(|s| s <= now);
        let not_ended = self.ends_at.is_none_or(|e| e > now);
        started && not_ended
    }
}
