// ── Cache keys and per-key read state ──
//
// Every cacheable read is named by a ResourceKey. The QueryRegistry
// tracks read state per key: it deduplicates concurrent refetches and
// isolates failures so a broken read never corrupts another key's data.

use dashmap::DashMap;

use crate::model::EntityId;

/// Names every cacheable read the store serves. Mutations invalidate the
/// key(s) they affect; creating a task in project X invalidates
/// `ProjectBoard(X)`, not the whole world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Users,
    Roles,
    Stores,
    Regions,
    Tickets,
    Promotions,
    Projects,
    ProjectBoard(EntityId),
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Users => write!(f, "users"),
            Self::Roles => write!(f, "roles"),
            Self::Stores => write!(f, "stores"),
            Self::Regions => write!(f, "regions"),
            Self::Tickets => write!(f, "tickets"),
            Self::Promotions => write!(f, "promotions"),
            Self::Projects => write!(f, "projects"),
            Self::ProjectBoard(id) => write!(f, "board:{id}"),
        }
    }
}

/// Read state for a single key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Fetching,
    /// The last refetch for this key failed. Cached data (if any) is
    /// still served; only this key is marked.
    Error(String),
}

/// Per-key read bookkeeping.
#[derive(Default)]
pub struct QueryRegistry {
    states: DashMap<ResourceKey, QueryState>,
}

impl QueryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to claim a fetch for `key`. Returns `false` if a fetch is
    /// already in flight -- the caller must then skip its own fetch
    /// (concurrent reads of the same key are deduplicated).
    pub fn begin(&self, key: &ResourceKey) -> bool {
        let mut entry = self.states.entry(key.clone()).or_default();
        if *entry == QueryState::Fetching {
            return false;
        }
        *entry = QueryState::Fetching;
        true
    }

    /// Mark a fetch as complete.
    pub fn complete(&self, key: &ResourceKey) {
        self.states.insert(key.clone(), QueryState::Idle);
    }

    /// Mark a fetch as failed. Only this key enters the error state.
    pub fn fail(&self, key: &ResourceKey, message: impl Into<String>) {
        self.states
            .insert(key.clone(), QueryState::Error(message.into()));
    }

    /// Current state for a key.
    pub fn state(&self, key: &ResourceKey) -> QueryState {
        self.states
            .get(key)
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn begin_deduplicates_concurrent_fetches() {
        let reg = QueryRegistry::new();
        assert!(reg.begin(&ResourceKey::Users));
        // Second claim while the first is in flight is refused.
        assert!(!reg.begin(&ResourceKey::Users));

        reg.complete(&ResourceKey::Users);
        assert!(reg.begin(&ResourceKey::Users));
    }

    #[test]
    fn failure_is_isolated_per_key() {
        let reg = QueryRegistry::new();
        assert!(reg.begin(&ResourceKey::Users));
        reg.fail(&ResourceKey::Users, "boom");

        assert_eq!(
            reg.state(&ResourceKey::Users),
            QueryState::Error("boom".into())
        );
        // Other keys are untouched.
        assert_eq!(reg.state(&ResourceKey::Stores), QueryState::Idle);
    }

    #[test]
    fn board_keys_are_distinct_per_project() {
        let reg = QueryRegistry::new();
        let a = ResourceKey::ProjectBoard(EntityId::from("p1"));
        let b = ResourceKey::ProjectBoard(EntityId::from("p2"));

        assert!(reg.begin(&a));
        assert!(reg.begin(&b));
        assert!(!reg.begin(&a));
    }

    #[test]
    fn error_clears_on_next_successful_cycle() {
        let reg = QueryRegistry::new();
        reg.begin(&ResourceKey::Tickets);
        reg.fail(&ResourceKey::Tickets, "offline");

        // A failed key can be claimed again.
        assert!(reg.begin(&ResourceKey::Tickets));
        reg.complete(&ResourceKey::Tickets);
        assert_eq!(reg.state(&ResourceKey::Tickets), QueryState::Idle);
    }
}
