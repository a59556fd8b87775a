// ── Full refresh application logic ──
//
// Applies bulk data fetched from the admin API into the DataStore.

use std::collections::HashSet;

use chrono::Utc;

use super::DataStore;
use super::collection::EntityCollection;
use crate::model::{
    EntityId, Project, Promotion, Region, Role, Store, Ticket, TicketSummary, User,
};

/// Upsert all incoming entities, then prune any existing ids not in the
/// incoming set. This avoids the brief empty state that clear-then-insert
/// would cause.
fn upsert_and_prune<T: Clone + Send + Sync + 'static>(
    collection: &EntityCollection<T>,
    items: Vec<(EntityId, T)>,
) {
    let incoming: HashSet<EntityId> = items.iter().map(|(id, _)| id.clone()).collect();
    for (id, entity) in items {
        collection.upsert(id, entity);
    }
    for existing in collection.ids() {
        if !incoming.contains(&existing) {
            collection.remove(&existing);
        }
    }
}

/// All collections fetched during a single full refresh cycle.
///
/// Board data is NOT included -- each project's board is fetched on demand
/// and refreshed through its own `ResourceKey::ProjectBoard` invalidation.
pub(crate) struct RefreshSnapshot {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub stores: Vec<Store>,
    pub regions: Vec<Region>,
    pub tickets: Vec<Ticket>,
    pub promotions: Vec<Promotion>,
    pub projects: Vec<Project>,
    pub ticket_summary: TicketSummary,
}

impl DataStore {
    /// Apply a full data refresh.
    ///
    /// Uses upsert-then-prune: incoming entities are upserted first, then
    /// any ids not present in the incoming set are removed.
    pub(crate) fn apply_full_snapshot(&self, snap: RefreshSnapshot) {
        upsert_and_prune(
            &self.users,
            snap.users
                .into_iter()
                .map(|u| (u.id.clone(), u))
                .collect(),
        );
        upsert_and_prune(
            &self.roles,
            snap.roles
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect(),
        );
        upsert_and_prune(
            &self.stores,
            snap.stores
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
        );
        upsert_and_prune(
            &self.regions,
            snap.regions
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect(),
        );
        upsert_and_prune(
            &self.tickets,
            snap.tickets
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect(),
        );
        upsert_and_prune(
            &self.promotions,
            snap.promotions
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
        );
        upsert_and_prune(
            &self.projects,
            snap.projects
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
        );

        self.apply_ticket_summary(snap.ticket_summary);

        self.last_full_refresh.send_replace(Some(Utc::now()));
    }

    // ── Single-key refetch application ───────────────────────────────
    //
    // Used by cache invalidation: a mutation invalidates one key, the
    // refetch replaces exactly that collection.

    pub(crate) fn apply_users(&self, users: Vec<User>) {
        upsert_and_prune(
            &self.users,
            users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        );
    }

    pub(crate) fn apply_roles(&self, roles: Vec<Role>) {
        upsert_and_prune(
            &self.roles,
            roles.into_iter().map(|r| (r.id.clone(), r)).collect(),
        );
    }

    pub(crate) fn apply_stores(&self, stores: Vec<Store>) {
        upsert_and_prune(
            &self.stores,
            stores.into_iter().map(|s| (s.id.clone(), s)).collect(),
        );
    }

    pub(crate) fn apply_regions(&self, regions: Vec<Region>) {
        upsert_and_prune(
            &self.regions,
            regions.into_iter().map(|r| (r.id.clone(), r)).collect(),
        );
    }

    pub(crate) fn apply_tickets(&self, tickets: Vec<Ticket>) {
        upsert_and_prune(
            &self.tickets,
            tickets.into_iter().map(|t| (t.id.clone(), t)).collect(),
        );
    }

    pub(crate) fn apply_promotions(&self, promotions: Vec<Promotion>) {
        upsert_and_prune(
            &self.promotions,
            promotions.into_iter().map(|p| (p.id.clone(), p)).collect(),
        );
    }

    pub(crate) fn apply_projects(&self, projects: Vec<Project>) {
        upsert_and_prune(
            &self.projects,
            projects.into_iter().map(|p| (p.id.clone(), p)).collect(),
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str) -> User {
        User {
            id: EntityId::from(id),
            username: name.to_owned(),
            display_name: None,
            email: None,
            role_id: None,
            store_id: None,
            enabled: true,
        }
    }

    fn snapshot_with_users(users: Vec<User>) -> RefreshSnapshot {
        RefreshSnapshot {
            users,
            roles: Vec::new(),
            stores: Vec::new(),
            regions: Vec::new(),
            tickets: Vec::new(),
            promotions: Vec::new(),
            projects: Vec::new(),
            ticket_summary: TicketSummary::default(),
        }
    }

    #[test]
    fn refresh_prunes_entities_missing_from_incoming_set() {
        let store = DataStore::new();
        store.apply_full_snapshot(snapshot_with_users(vec![
            user("u1", "amy"),
            user("u2", "bo"),
        ]));
        assert_eq!(store.user_count(), 2);

        // u2 disappeared server-side.
        store.apply_full_snapshot(snapshot_with_users(vec![user("u1", "amy")]));
        assert_eq!(store.user_count(), 1);
        assert!(store.user_by_id(&EntityId::from("u2")).is_none());
    }

    #[test]
    fn refresh_updates_in_place_without_empty_window() {
        let store = DataStore::new();
        store.apply_full_snapshot(snapshot_with_users(vec![user("u1", "amy")]));

        let rx = store.subscribe_users();
        store.apply_full_snapshot(snapshot_with_users(vec![user("u1", "amy-renamed")]));

        // The collection never passed through an empty state.
        assert_eq!(rx.latest().len(), 1);
        assert_eq!(
            store.user_by_id(&EntityId::from("u1")).unwrap().username,
            "amy-renamed"
        );
    }

    #[test]
    fn refresh_stamps_timestamp() {
        let store = DataStore::new();
        assert!(store.last_full_refresh().is_none());
        store.apply_full_snapshot(snapshot_with_users(Vec::new()));
        assert!(store.last_full_refresh().is_some());
        assert!(store.data_age().is_some());
    }
}
