// ── Central reactive data store ──
//
// Thread-safe, lock-free cache for every resource the console manages.
// Mutations are broadcast to subscribers via `watch` channels. The store
// is the single shared mutable resource: only the controller's command
// processor and refresh tasks write to it.

pub(crate) mod collection;
pub mod keys;
mod refresh;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;

use self::collection::EntityCollection;
pub(crate) use self::refresh::RefreshSnapshot;

use crate::model::{
    BoardSnapshot, EntityId, Project, Promotion, Region, Role, Store, Ticket, TicketSummary, User,
};
use crate::stream::EntityStream;

/// Central reactive cache for all domain entities.
///
/// All reads are wait-free; writes use fine-grained per-shard locks within
/// `DashMap`. Each project's board is cached under its own key so a board
/// refetch never disturbs the org-level collections.
pub struct DataStore {
    pub(crate) users: EntityCollection<User>,
    pub(crate) roles: EntityCollection<Role>,
    pub(crate) stores: EntityCollection<Store>,
    pub(crate) regions: EntityCollection<Region>,
    pub(crate) tickets: EntityCollection<Ticket>,
    pub(crate) promotions: EntityCollection<Promotion>,
    pub(crate) projects: EntityCollection<Project>,
    pub(crate) boards: DashMap<EntityId, watch::Sender<Arc<BoardSnapshot>>>,
    pub(crate) ticket_summary: watch::Sender<TicketSummary>,
    pub(crate) last_full_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (ticket_summary, _) = watch::channel(TicketSummary::default());
        let (last_full_refresh, _) = watch::channel(None);

        Self {
            users: EntityCollection::new(),
            roles: EntityCollection::new(),
            stores: EntityCollection::new(),
            regions: EntityCollection::new(),
            tickets: EntityCollection::new(),
            promotions: EntityCollection::new(),
            projects: EntityCollection::new(),
            boards: DashMap::new(),
            ticket_summary,
            last_full_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.users.snapshot()
    }

    pub fn roles_snapshot(&self) -> Arc<Vec<Arc<Role>>> {
        self.roles.snapshot()
    }

    pub fn stores_snapshot(&self) -> Arc<Vec<Arc<Store>>> {
        self.stores.snapshot()
    }

    pub fn regions_snapshot(&self) -> Arc<Vec<Arc<Region>>> {
        self.regions.snapshot()
    }

    pub fn tickets_snapshot(&self) -> Arc<Vec<Arc<Ticket>>> {
        self.tickets.snapshot()
    }

    pub fn promotions_snapshot(&self) -> Arc<Vec<Arc<Promotion>>> {
        self.promotions.snapshot()
    }

    pub fn projects_snapshot(&self) -> Arc<Vec<Arc<Project>>> {
        self.projects.snapshot()
    }

    /// Current board snapshot for a project (empty until first fetch).
    pub fn board_snapshot(&self, project_id: &EntityId) -> Arc<BoardSnapshot> {
        self.board_sender(project_id).borrow().clone()
    }

    pub fn ticket_summary(&self) -> TicketSummary {
        *self.ticket_summary.borrow()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn user_by_id(&self, id: &EntityId) -> Option<Arc<User>> {
        self.users.get(id)
    }

    pub fn role_by_id(&self, id: &EntityId) -> Option<Arc<Role>> {
        self.roles.get(id)
    }

    pub fn store_by_id(&self, id: &EntityId) -> Option<Arc<Store>> {
        self.stores.get(id)
    }

    pub fn region_by_id(&self, id: &EntityId) -> Option<Arc<Region>> {
        self.regions.get(id)
    }

    pub fn ticket_by_id(&self, id: &EntityId) -> Option<Arc<Ticket>> {
        self.tickets.get(id)
    }

    pub fn promotion_by_id(&self, id: &EntityId) -> Option<Arc<Promotion>> {
        self.promotions.get(id)
    }

    pub fn project_by_id(&self, id: &EntityId) -> Option<Arc<Project>> {
        self.projects.get(id)
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_users(&self) -> EntityStream<User> {
        EntityStream::new(self.users.subscribe())
    }

    pub fn subscribe_roles(&self) -> EntityStream<Role> {
        EntityStream::new(self.roles.subscribe())
    }

    pub fn subscribe_stores(&self) -> EntityStream<Store> {
        EntityStream::new(self.stores.subscribe())
    }

    pub fn subscribe_regions(&self) -> EntityStream<Region> {
        EntityStream::new(self.regions.subscribe())
    }

    pub fn subscribe_tickets(&self) -> EntityStream<Ticket> {
        EntityStream::new(self.tickets.subscribe())
    }

    pub fn subscribe_promotions(&self) -> EntityStream<Promotion> {
        EntityStream::new(self.promotions.subscribe())
    }

    pub fn subscribe_projects(&self) -> EntityStream<Project> {
        EntityStream::new(self.projects.subscribe())
    }

    /// Subscribe to a project's board snapshot.
    pub fn subscribe_board(&self, project_id: &EntityId) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.board_sender(project_id).subscribe()
    }

    pub fn subscribe_ticket_summary(&self) -> watch::Receiver<TicketSummary> {
        self.ticket_summary.subscribe()
    }

    // ── Writers (crate-internal) ─────────────────────────────────────

    /// Replace a project's board snapshot with fresh server truth.
    pub(crate) fn apply_board(&self, project_id: &EntityId, board: BoardSnapshot) {
        self.board_sender(project_id)
            .send_modify(|snap| *snap = Arc::new(board));
    }

    pub(crate) fn apply_ticket_summary(&self, summary: TicketSummary) {
        let _ = self.ticket_summary.send(summary);
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_full_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_full_refresh.borrow()
    }

    /// How long ago the last full refresh occurred, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_full_refresh().map(|t| Utc::now() - t)
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn board_sender(
        &self,
        project_id: &EntityId,
    ) -> dashmap::mapref::one::RefMut<'_, EntityId, watch::Sender<Arc<BoardSnapshot>>> {
        self.boards.entry(project_id.clone()).or_insert_with(|| {
            let (tx, _) = watch::channel(Arc::new(BoardSnapshot::default()));
            tx
        })
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
