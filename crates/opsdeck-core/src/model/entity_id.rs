// ── Core identity types ──
//
// EntityId is the server-assigned identifier every persisted row carries.
// ItemId extends it for board items that may exist locally before the
// create request resolves: whether an item is safe to reference in a
// server request is a type-level distinction, not a string-prefix check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ── EntityId ────────────────────────────────────────────────────────

/// Canonical identifier for any persisted entity, as assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── ItemId ──────────────────────────────────────────────────────────

/// Identity of a board item.
///
/// `Persisted` rows exist on the server and may be referenced in move and
/// update requests. `Pending` rows exist only locally while their create
/// request is in flight; they are never sent to the server, and their
/// local id never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemId {
    Persisted(EntityId),
    Pending(Uuid),
}

impl ItemId {
    /// Mint a fresh local identity for an unsaved item.
    pub fn fresh_pending() -> Self {
        Self::Pending(Uuid::new_v4())
    }

    /// The server identity, if this item has one.
    pub fn persisted(&self) -> Option<&EntityId> {
        match self {
            Self::Persisted(id) => Some(id),
            Self::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persisted(id) => write!(f, "{id}"),
            Self::Pending(local) => write!(f, "(unsaved {local})"),
        }
    }
}

impl From<EntityId> for ItemId {
    fn from(id: EntityId) -> Self {
        Self::Persisted(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_round_trips_display() {
        let id = EntityId::from("store_42");
        assert_eq!(id.to_string(), "store_42");
        assert_eq!(id.as_str(), "store_42");
    }

    #[test]
    fn pending_item_has_no_persisted_id() {
        let id = ItemId::fresh_pending();
        assert!(id.is_pending());
        assert!(id.persisted().is_none());
    }

    #[test]
    fn persisted_item_exposes_entity_id() {
        let id = ItemId::from(EntityId::from("task_1"));
        assert!(!id.is_pending());
        assert_eq!(id.persisted().unwrap().as_str(), "task_1");
    }

    #[test]
    fn fresh_pending_ids_are_distinct() {
        assert_ne!(ItemId::fresh_pending(), ItemId::fresh_pending());
    }
}
