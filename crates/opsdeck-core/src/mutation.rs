// ── Optimistic mutation bookkeeping ──
//
// Edits apply to local view state immediately, then travel to the server.
// Two guards keep local state honest while requests are in flight:
//
// - `Revisions`: per-item sequence numbers. Each optimistic edit claims
//   the item's next revision; a completion callback whose claimed revision
//   is no longer current must not write its (stale) result back over a
//   newer edit -- it only triggers invalidation and lets the next cache
//   read reconcile.
//
// - `Generation`: a coarse counter for bulk fetches. A response tagged
//   with an old generation is discarded wholesale (the user already
//   switched context and a newer request is in flight).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::model::EntityId;

// ── Per-item revisions ──────────────────────────────────────────────

/// Monotonically increasing revision per item id.
#[derive(Default)]
pub struct Revisions {
    revs: DashMap<EntityId, u64>,
}

impl Revisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next revision for an item. Call when applying an
    /// optimistic edit; keep the returned ticket with the in-flight request.
    pub fn begin(&self, id: &EntityId) -> u64 {
        let mut entry = self.revs.entry(id.clone()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current revision for an item (0 if never edited).
    pub fn current(&self, id: &EntityId) -> u64 {
        self.revs.get(id).map_or(0, |r| *r.value())
    }

    /// Whether a claimed ticket is still the newest edit for the item.
    /// A stale ticket means a later edit superseded this request.
    pub fn is_current(&self, id: &EntityId, ticket: u64) -> bool {
        self.current(id) == ticket
    }

    /// Forget an item (after it is deleted).
    pub fn forget(&self, id: &EntityId) {
        self.revs.remove(id);
    }
}

// ── Optimistic edit snapshot ────────────────────────────────────────

/// Pre-mutation snapshot of a single row, held while its request is in
/// flight. On failure the snapshot restores the row exactly; on success
/// it is dropped and cache invalidation reconciles.
#[derive(Debug, Clone)]
pub struct OptimisticEdit<T: Clone> {
    snapshot: T,
    ticket: u64,
}

impl<T: Clone> OptimisticEdit<T> {
    /// Capture the row as it was before the edit, with the revision
    /// ticket claimed for the in-flight request.
    pub fn capture(row: &T, ticket: u64) -> Self {
        Self {
            snapshot: row.clone(),
            ticket,
        }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// The pre-edit row, for rollback.
    pub fn into_snapshot(self) -> T {
        self.snapshot
    }

    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }
}

// ── Bulk-fetch generation guard ─────────────────────────────────────

/// Shared generation counter; stale responses are detected by comparing
/// the generation captured at request time with the current one.
#[derive(Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump and return the new generation. Call when issuing a request.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Whether a captured generation is still the latest.
    pub fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::Relaxed) == generation
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn stale_ticket_is_detected_after_second_edit() {
        let revs = Revisions::new();
        let id = EntityId::from("task_1");

        // rename, then toggle status before the rename resolves
        let rename = revs.begin(&id);
        let toggle = revs.begin(&id);

        // The rename's completion arrives late: it must not write back.
        assert!(!revs.is_current(&id, rename));
        // The toggle is the newest edit and may commit.
        assert!(revs.is_current(&id, toggle));
    }

    #[test]
    fn revisions_are_independent_per_item() {
        let revs = Revisions::new();
        let a = EntityId::from("a");
        let b = EntityId::from("b");

        let ta = revs.begin(&a);
        let tb = revs.begin(&b);

        assert!(revs.is_current(&a, ta));
        assert!(revs.is_current(&b, tb));
    }

    #[test]
    fn forget_resets_an_item() {
        let revs = Revisions::new();
        let id = EntityId::from("gone");
        revs.begin(&id);
        revs.forget(&id);
        assert_eq!(revs.current(&id), 0);
    }

    #[test]
    fn optimistic_edit_restores_exact_snapshot() {
        let revs = Revisions::new();
        let id = EntityId::from("task_1");

        let mut row = String::from("original name");
        let edit = OptimisticEdit::capture(&row, revs.begin(&id));

        row = String::from("optimistic name");
        assert_ne!(row, *edit.snapshot());

        // Remote failure: restore.
        row = edit.into_snapshot();
        assert_eq!(row, "original name");
    }

    #[test]
    fn generation_discards_stale_bulk_responses() {
        let generation = Generation::new();

        let first = generation.next();
        let second = generation.next();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }
}
