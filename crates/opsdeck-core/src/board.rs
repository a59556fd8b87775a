// ── Ordered-list reconciliation ──
//
// The project board keeps a client-owned copy of each ordered list
// (sections, and tasks per section) that may diverge from the cached
// server truth while a gesture or an unsaved insert is in flight.
//
// Rules the whole module hangs on:
//
// - Position changes travel as adjacency: the two nearest *persisted*
//   neighbors at the drop position. Pending items are skipped when
//   computing adjacency and never appear in a request themselves.
// - The pre-gesture snapshot is kept until the move either confirms or
//   fails; failure restores it exactly (structural equality, not count).
// - Reconciliation from the cache is suspended while a gesture is in
//   progress, while a move is unconfirmed, and while any pending item
//   exists whose persisted counterpart has not yet arrived.
// - The server is the sole authority for rank values. Once a list
//   reconciles, its order is the server's order.

use indexmap::IndexMap;

use crate::model::{EntityId, ItemId, BoardSnapshot, Section, Task};

// ── Item contract ───────────────────────────────────────────────────

/// What the reconciliation engine needs to know about a list item.
pub trait OrderedItem: Clone {
    /// Server identity, if the item has one. `None` marks a pending
    /// (unsaved) item.
    fn persisted_id(&self) -> Option<&EntityId>;

    /// Same identity (persisted or local).
    fn same_item(&self, other: &Self) -> bool;

    /// Structural equality for reconciliation. Any difference between
    /// local and server representations forces a replace.
    fn same_content(&self, other: &Self) -> bool;

    /// Whether a server row is plausibly the persisted counterpart of
    /// this pending item (IDs differ by construction, so match content).
    fn matches_insert(&self, other: &Self) -> bool;

    fn is_pending(&self) -> bool {
        self.persisted_id().is_none()
    }
}

impl OrderedItem for Section {
    fn persisted_id(&self) -> Option<&EntityId> {
        Some(&self.id)
    }

    fn same_item(&self, other: &Self) -> bool {
        self.id == other.id
    }

    fn same_content(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name && self.rank == other.rank
    }

    fn matches_insert(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl OrderedItem for Task {
    fn persisted_id(&self) -> Option<&EntityId> {
        self.id.persisted()
    }

    fn same_item(&self, other: &Self) -> bool {
        self.id == other.id
    }

    fn same_content(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.status == other.status
            && self.due_date == other.due_date
            && self.rank == other.rank
    }

    fn matches_insert(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// ── Sync state machine ──────────────────────────────────────────────

/// Where a list stands relative to the cached server truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// Local view state matches the cache.
    #[default]
    Synced,
    /// A gesture is in progress; reconciliation is suspended.
    Dragging,
    /// An unsaved item exists locally; reconciliation is suspended so
    /// the new row cannot vanish before its create resolves.
    PendingInsert,
    /// A move request is unconfirmed; the pre-gesture snapshot is held
    /// for rollback and reconciliation stays suspended.
    Reconciling,
}

/// Target position of a move, as sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePosition {
    pub item_id: EntityId,
    pub before_id: Option<EntityId>,
    pub after_id: Option<EntityId>,
}

/// What a drop produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// A persisted item changed position: issue a move request.
    Move(MovePosition),
    /// The dragged item is still pending: keep the local order, no
    /// request until the item is persisted.
    LocalOnly,
    /// The item landed where it started: nothing to send.
    Unchanged,
    /// No gesture was in progress.
    NoDrag,
}

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Reconciliation is suspended (gesture, unconfirmed move, or an
    /// unresolved pending insert).
    Suspended,
    /// Local and server representations already agree.
    Clean,
    /// Local view state was replaced with server truth.
    Replaced,
}

// ── ListSync ────────────────────────────────────────────────────────

/// Client-owned ordered list, synchronized against cached server truth.
#[derive(Debug, Clone)]
pub struct ListSync<T: OrderedItem> {
    items: Vec<T>,
    drag_index: Option<usize>,
    /// Snapshot captured at gesture start, held until confirm/rollback.
    pre_op: Option<Vec<T>>,
}

impl<T: OrderedItem> ListSync<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            drag_index: None,
            pre_op: None,
        }
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            drag_index: None,
            pre_op: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> SyncPhase {
        if self.drag_index.is_some() {
            SyncPhase::Dragging
        } else if self.pre_op.is_some() {
            SyncPhase::Reconciling
        } else if self.items.iter().any(OrderedItem::is_pending) {
            SyncPhase::PendingInsert
        } else {
            SyncPhase::Synced
        }
    }

    // ── Gesture ──────────────────────────────────────────────────────

    /// Start a drag. Captures the rollback snapshot and suspends
    /// reconciliation. Returns `false` if a gesture is already active or
    /// the index is out of range.
    pub fn begin_drag(&mut self, index: usize) -> bool {
        if self.drag_index.is_some() || self.pre_op.is_some() || index >= self.items.len() {
            return false;
        }
        self.pre_op = Some(self.items.clone());
        self.drag_index = Some(index);
        true
    }

    pub fn drag_index(&self) -> Option<usize> {
        self.drag_index
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_index.is_some()
    }

    /// Move the dragged item by `delta` positions (clamped). Returns the
    /// new index while a gesture is active.
    pub fn move_dragged(&mut self, delta: isize) -> Option<usize> {
        let index = self.drag_index?;
        if self.items.is_empty() {
            return Some(index);
        }
        let new_index = index
            .saturating_add_signed(delta)
            .min(self.items.len() - 1);
        if new_index != index {
            let item = self.items.remove(index);
            self.items.insert(new_index, item);
            self.drag_index = Some(new_index);
        }
        Some(new_index)
    }

    /// End the gesture. The local order already reflects the drop; the
    /// outcome says whether a move request is needed and carries the
    /// persisted-neighbor adjacency when it is.
    pub fn drop_dragged(&mut self) -> DropOutcome {
        let Some(index) = self.drag_index.take() else {
            return DropOutcome::NoDrag;
        };
        let Some(item) = self.items.get(index) else {
            self.pre_op = None;
            return DropOutcome::NoDrag;
        };

        let Some(item_id) = item.persisted_id().cloned() else {
            // Unsaved item: keep the local order but issue nothing until
            // the create resolves.
            self.pre_op = None;
            return DropOutcome::LocalOnly;
        };

        if let Some(snapshot) = &self.pre_op {
            if same_order(&self.items, snapshot) {
                self.pre_op = None;
                return DropOutcome::Unchanged;
            }
        }

        let (before_id, after_id) = self.adjacency(index);
        DropOutcome::Move(MovePosition {
            item_id,
            before_id,
            after_id,
        })
    }

    /// Abort the gesture, restoring the pre-drag order.
    pub fn cancel_drag(&mut self) {
        if let Some(snapshot) = self.pre_op.take() {
            self.items = snapshot;
        }
        self.drag_index = None;
    }

    /// The move request failed: restore the exact pre-gesture state.
    pub fn rollback(&mut self) {
        if let Some(snapshot) = self.pre_op.take() {
            self.items = snapshot;
        }
        self.drag_index = None;
    }

    /// The move request succeeded: release the snapshot. The next cache
    /// reconcile brings the server-ranked order in.
    pub fn confirm_move(&mut self) {
        self.pre_op = None;
    }

    /// Nearest persisted neighbors around `index`, skipping pending
    /// items; `None` at either boundary.
    pub fn adjacency(&self, index: usize) -> (Option<EntityId>, Option<EntityId>) {
        let before = self.items[..index.min(self.items.len())]
            .iter()
            .rev()
            .find_map(|i| i.persisted_id().cloned());
        let after = self
            .items
            .iter()
            .skip(index + 1)
            .find_map(|i| i.persisted_id().cloned());
        (before, after)
    }

    // ── Inserts and edits ────────────────────────────────────────────

    /// Append an unsaved item. Reconciliation suspends until its
    /// persisted counterpart arrives (or the insert is aborted).
    pub fn begin_insert(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the first item matching the predicate (used to abort a
    /// failed pending insert). Returns the removed item.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let index = self.items.iter().position(|i| pred(i))?;
        Some(self.items.remove(index))
    }

    /// Apply an in-place edit to the first matching item, returning a
    /// clone of the row as it was before the edit (for rollback).
    pub fn update_where(&mut self, pred: impl Fn(&T) -> bool, f: impl FnOnce(&mut T)) -> Option<T> {
        let item = self.items.iter_mut().find(|i| pred(i))?;
        let snapshot = item.clone();
        f(item);
        Some(snapshot)
    }

    /// Replace a row by identity (rollback of a single-row edit).
    pub fn restore(&mut self, snapshot: T) -> bool {
        if let Some(item) = self.items.iter_mut().find(|i| i.same_item(&snapshot)) {
            *item = snapshot;
            true
        } else {
            false
        }
    }

    // ── Reconciliation ───────────────────────────────────────────────

    /// Merge fresh server truth into local view state.
    ///
    /// Skipped entirely while suspended. With pending inserts present,
    /// the pass only applies once every pending item's persisted
    /// counterpart is visible in the server list -- at which point server
    /// truth replaces local state wholesale (one row per item, no
    /// leftover temp rows). Otherwise any element-for-element difference
    /// forces a replace.
    pub fn reconcile(&mut self, server: Vec<T>) -> Reconcile {
        if self.drag_index.is_some() || self.pre_op.is_some() {
            return Reconcile::Suspended;
        }

        if self.items.iter().any(OrderedItem::is_pending) {
            let resolvable = self
                .items
                .iter()
                .filter(|i| i.is_pending())
                .all(|pending| server.iter().any(|s| pending.matches_insert(s)));
            if !resolvable {
                return Reconcile::Suspended;
            }
            self.items = server;
            return Reconcile::Replaced;
        }

        if agrees(&self.items, &server) {
            Reconcile::Clean
        } else {
            self.items = server;
            Reconcile::Replaced
        }
    }

    // ── Internal mutators (board-level gestures) ─────────────────────

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub(crate) fn insert_at(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    pub(crate) fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
    }
}

impl<T: OrderedItem> Default for ListSync<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity-order equality (content-insensitive).
fn same_order<T: OrderedItem>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_item(y))
}

/// Element-for-element structural equality.
fn agrees<T: OrderedItem>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_content(y))
}

// ── Board ───────────────────────────────────────────────────────────

/// Target position of a task move, including its destination section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTaskPosition {
    pub task_id: EntityId,
    pub section_id: EntityId,
    pub before_id: Option<EntityId>,
    pub after_id: Option<EntityId>,
}

/// What a task drop produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskDropOutcome {
    Move(MoveTaskPosition),
    LocalOnly,
    Unchanged,
    NoDrag,
}

#[derive(Debug, Clone)]
struct TaskDrag {
    section: EntityId,
    index: usize,
}

/// The client-owned view of one project's board: a section list plus a
/// task list per section. Task gestures are board-level so a drag can
/// cross section boundaries; the pre-gesture snapshot spans every column
/// and rollback restores all of them exactly.
pub struct Board {
    project_id: EntityId,
    sections: ListSync<Section>,
    columns: IndexMap<EntityId, ListSync<Task>>,
    task_drag: Option<TaskDrag>,
    task_pre_op: Option<IndexMap<EntityId, Vec<Task>>>,
}

impl Board {
    pub fn new(project_id: EntityId) -> Self {
        Self {
            project_id,
            sections: ListSync::new(),
            columns: IndexMap::new(),
            task_drag: None,
            task_pre_op: None,
        }
    }

    pub fn project_id(&self) -> &EntityId {
        &self.project_id
    }

    pub fn sections(&self) -> &ListSync<Section> {
        &self.sections
    }

    /// The section list is its own ordered list; section gestures go
    /// through it directly.
    pub fn sections_mut(&mut self) -> &mut ListSync<Section> {
        &mut self.sections
    }

    pub fn column(&self, section_id: &EntityId) -> Option<&ListSync<Task>> {
        self.columns.get(section_id)
    }

    pub fn column_mut(&mut self, section_id: &EntityId) -> Option<&mut ListSync<Task>> {
        self.columns.get_mut(section_id)
    }

    // ── Task gesture (board-level, may cross sections) ───────────────

    /// Grab a task. Snapshots every column for exact rollback.
    pub fn begin_task_drag(&mut self, section_id: &EntityId, index: usize) -> bool {
        if self.task_drag.is_some() || self.task_pre_op.is_some() {
            return false;
        }
        let Some(column) = self.columns.get(section_id) else {
            return false;
        };
        if index >= column.len() {
            return false;
        }
        self.task_pre_op = Some(self.snapshot_columns());
        self.task_drag = Some(TaskDrag {
            section: section_id.clone(),
            index,
        });
        true
    }

    /// The active gesture: (section, index).
    pub fn task_drag(&self) -> Option<(&EntityId, usize)> {
        self.task_drag.as_ref().map(|d| (&d.section, d.index))
    }

    pub fn is_task_dragging(&self) -> bool {
        self.task_drag.is_some()
    }

    /// Move the grabbed task within its current section.
    pub fn move_task_drag(&mut self, delta: isize) {
        let Some(drag) = self.task_drag.as_mut() else {
            return;
        };
        let Some(column) = self.columns.get_mut(&drag.section) else {
            return;
        };
        if column.is_empty() {
            return;
        }
        let new_index = drag
            .index
            .saturating_add_signed(delta)
            .min(column.len() - 1);
        if new_index != drag.index {
            if let Some(item) = column.remove_at(drag.index) {
                column.insert_at(new_index, item);
                drag.index = new_index;
            }
        }
    }

    /// Carry the grabbed task into another section, keeping its visual
    /// position clamped to the target column. Pending tasks stay in the
    /// section their create request targets.
    pub fn transfer_task_drag(&mut self, to_section: &EntityId) -> bool {
        let Some(drag) = self.task_drag.as_ref() else {
            return false;
        };
        if drag.section == *to_section || !self.columns.contains_key(to_section) {
            return false;
        }
        let from = drag.section.clone();
        let index = drag.index;

        let is_pending = self
            .columns
            .get(&from)
            .and_then(|c| c.get(index))
            .is_none_or(|t| t.id.is_pending());
        if is_pending {
            return false;
        }

        let Some(mut task) = self.columns.get_mut(&from).and_then(|c| c.remove_at(index)) else {
            return false;
        };
        task.section_id = to_section.clone();

        let target = match self.columns.get_mut(to_section) {
            Some(t) => t,
            None => return false,
        };
        let new_index = index.min(target.len());
        target.insert_at(new_index, task);

        if let Some(drag) = self.task_drag.as_mut() {
            drag.section = to_section.clone();
            drag.index = new_index;
        }
        true
    }

    /// Drop the grabbed task.
    pub fn drop_task_drag(&mut self) -> TaskDropOutcome {
        let Some(drag) = self.task_drag.take() else {
            return TaskDropOutcome::NoDrag;
        };
        let Some(column) = self.columns.get(&drag.section) else {
            self.task_pre_op = None;
            return TaskDropOutcome::NoDrag;
        };
        let Some(task) = column.get(drag.index) else {
            self.task_pre_op = None;
            return TaskDropOutcome::NoDrag;
        };

        let Some(task_id) = task.id.persisted().cloned() else {
            self.task_pre_op = None;
            return TaskDropOutcome::LocalOnly;
        };

        if let Some(snapshot) = &self.task_pre_op {
            if self.columns_match(snapshot) {
                self.task_pre_op = None;
                return TaskDropOutcome::Unchanged;
            }
        }

        let (before_id, after_id) = column.adjacency(drag.index);
        TaskDropOutcome::Move(MoveTaskPosition {
            task_id,
            section_id: drag.section,
            before_id,
            after_id,
        })
    }

    /// Abort the gesture, restoring every column.
    pub fn cancel_task_drag(&mut self) {
        self.task_drag = None;
        if let Some(snapshot) = self.task_pre_op.take() {
            self.restore_columns(snapshot);
        }
    }

    /// The move request failed: restore the exact pre-gesture board.
    pub fn rollback_task_move(&mut self) {
        self.task_drag = None;
        if let Some(snapshot) = self.task_pre_op.take() {
            self.restore_columns(snapshot);
        }
    }

    /// The move request succeeded: release the snapshot so the next
    /// cache reconcile can land.
    pub fn confirm_task_move(&mut self) {
        self.task_pre_op = None;
    }

    // ── Inserts and edits ────────────────────────────────────────────

    /// Append a blank local task to a section. Returns its pending id
    /// for matching the eventual create result or aborting on failure.
    pub fn begin_task_insert(&mut self, section_id: &EntityId, name: impl Into<String>) -> Option<ItemId> {
        let column = self.columns.get_mut(section_id)?;
        let task = Task::pending(section_id.clone(), name);
        let id = task.id.clone();
        column.begin_insert(task);
        Some(id)
    }

    /// The create request failed: drop the pending row.
    pub fn abort_task_insert(&mut self, section_id: &EntityId, pending_id: &ItemId) {
        if let Some(column) = self.columns.get_mut(section_id) {
            column.remove_where(|t| t.id == *pending_id);
        }
    }

    /// Optimistically edit a task in place, returning the pre-edit row.
    pub fn update_task(
        &mut self,
        section_id: &EntityId,
        task_id: &EntityId,
        f: impl FnOnce(&mut Task),
    ) -> Option<Task> {
        self.columns
            .get_mut(section_id)?
            .update_where(|t| t.id.persisted() == Some(task_id), f)
    }

    /// Roll a single-row edit back to its snapshot.
    pub fn restore_task(&mut self, snapshot: Task) {
        if let Some(column) = self.columns.get_mut(&snapshot.section_id) {
            column.restore(snapshot);
        }
    }

    // ── Reconciliation ───────────────────────────────────────────────

    /// Merge a fresh board snapshot from the cache.
    ///
    /// Sections reconcile through their own list. Columns are rebuilt to
    /// track the section set, then each reconciles independently -- but
    /// the whole pass is suspended while a task gesture or unconfirmed
    /// task move is in flight.
    pub fn reconcile(&mut self, snapshot: &BoardSnapshot) -> Reconcile {
        if self.task_drag.is_some() || self.task_pre_op.is_some() {
            return Reconcile::Suspended;
        }

        let sections_result = self.sections.reconcile(snapshot.sections.clone());

        // Track the section set: create new columns, drop vanished ones.
        let section_ids: Vec<EntityId> =
            self.sections.items().iter().map(|s| s.id.clone()).collect();
        self.columns.retain(|id, _| section_ids.contains(id));

        let mut any_replaced = matches!(sections_result, Reconcile::Replaced);
        let mut any_suspended = matches!(sections_result, Reconcile::Suspended);

        for section_id in section_ids {
            let server_tasks: Vec<Task> = snapshot
                .tasks_in(&section_id)
                .cloned()
                .collect();
            let column = self.columns.entry(section_id).or_default();
            match column.reconcile(server_tasks) {
                Reconcile::Replaced => any_replaced = true,
                Reconcile::Suspended => any_suspended = true,
                Reconcile::Clean => {}
            }
        }

        if any_suspended {
            Reconcile::Suspended
        } else if any_replaced {
            Reconcile::Replaced
        } else {
            Reconcile::Clean
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn snapshot_columns(&self) -> IndexMap<EntityId, Vec<Task>> {
        self.columns
            .iter()
            .map(|(id, col)| (id.clone(), col.items().to_vec()))
            .collect()
    }

    fn restore_columns(&mut self, snapshot: IndexMap<EntityId, Vec<Task>>) {
        for (id, items) in snapshot {
            if let Some(column) = self.columns.get_mut(&id) {
                column.set_items(items);
            }
        }
    }

    fn columns_match(&self, snapshot: &IndexMap<EntityId, Vec<Task>>) -> bool {
        snapshot.len() == self.columns.len()
            && snapshot.iter().all(|(id, items)| {
                self.columns
                    .get(id)
                    .is_some_and(|col| same_order(col.items(), items))
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::TaskStatus;

    fn task(id: &str, section: &str, name: &str, rank: &str) -> Task {
        Task {
            id: ItemId::from(EntityId::from(id)),
            section_id: EntityId::from(section),
            name: name.to_owned(),
            status: TaskStatus::Todo,
            due_date: None,
            rank: rank.to_owned(),
            subtasks: Vec::new(),
            attachment_count: 0,
        }
    }

    fn section(id: &str, name: &str, rank: &str) -> Section {
        Section {
            id: EntityId::from(id),
            project_id: EntityId::from("p1"),
            name: name.to_owned(),
            rank: rank.to_owned(),
        }
    }

    fn ids<T: OrderedItem>(list: &ListSync<T>) -> Vec<String> {
        list.items()
            .iter()
            .map(|i| {
                i.persisted_id()
                    .map_or_else(|| "(pending)".to_owned(), ToString::to_string)
            })
            .collect()
    }

    fn abc() -> ListSync<Task> {
        ListSync::from_items(vec![
            task("a", "s1", "A", "1"),
            task("b", "s1", "B", "2"),
            task("c", "s1", "C", "3"),
        ])
    }

    // ── ListSync: gestures and adjacency ─────────────────────────────

    #[test]
    fn drop_carries_persisted_neighbor_adjacency() {
        // [B, A, C]: drag B (index 0) down one slot -> [A, B, C].
        let mut list = ListSync::from_items(vec![
            task("b", "s1", "B", "1"),
            task("a", "s1", "A", "2"),
            task("c", "s1", "C", "3"),
        ]);

        assert!(list.begin_drag(0));
        assert_eq!(list.phase(), SyncPhase::Dragging);
        list.move_dragged(1);

        let outcome = list.drop_dragged();
        match outcome {
            DropOutcome::Move(pos) => {
                assert_eq!(pos.item_id, EntityId::from("b"));
                assert_eq!(pos.before_id, Some(EntityId::from("a")));
                assert_eq!(pos.after_id, Some(EntityId::from("c")));
            }
            other => panic!("expected Move, got {other:?}"),
        }
        assert_eq!(ids(&list), ["a", "b", "c"]);
        // Snapshot held until confirm/rollback.
        assert_eq!(list.phase(), SyncPhase::Reconciling);
    }

    #[test]
    fn boundary_adjacency_is_none() {
        let mut list = abc();
        assert!(list.begin_drag(2));
        list.move_dragged(-2); // C to the front

        match list.drop_dragged() {
            DropOutcome::Move(pos) => {
                assert_eq!(pos.before_id, None);
                assert_eq!(pos.after_id, Some(EntityId::from("a")));
            }
            other => panic!("expected Move, got {other:?}"),
        }
    }

    #[test]
    fn rollback_restores_exact_pre_drag_order() {
        let mut list = ListSync::from_items(vec![
            task("b", "s1", "B", "1"),
            task("a", "s1", "A", "2"),
            task("c", "s1", "C", "3"),
        ]);

        assert!(list.begin_drag(0));
        list.move_dragged(1);
        let outcome = list.drop_dragged();
        assert!(matches!(outcome, DropOutcome::Move(_)));

        // Remote failure: the list returns to whatever it was pre-drag.
        list.rollback();
        assert_eq!(ids(&list), ["b", "a", "c"]);
        assert_eq!(list.phase(), SyncPhase::Synced);
    }

    #[test]
    fn drop_in_place_issues_nothing() {
        let mut list = abc();
        assert!(list.begin_drag(1));
        list.move_dragged(1);
        list.move_dragged(-1);

        assert_eq!(list.drop_dragged(), DropOutcome::Unchanged);
        assert_eq!(list.phase(), SyncPhase::Synced);
    }

    #[test]
    fn cancel_drag_restores_order() {
        let mut list = abc();
        assert!(list.begin_drag(0));
        list.move_dragged(2);
        list.cancel_drag();
        assert_eq!(ids(&list), ["a", "b", "c"]);
    }

    #[test]
    fn dragging_a_pending_item_issues_no_request() {
        let mut list = abc();
        list.begin_insert(Task::pending(EntityId::from("s1"), "draft"));

        assert!(list.begin_drag(3));
        list.move_dragged(-3);
        assert_eq!(list.drop_dragged(), DropOutcome::LocalOnly);
        // Local order keeps the pending row where it was dropped.
        assert_eq!(ids(&list)[0], "(pending)");
    }

    #[test]
    fn adjacency_skips_pending_neighbors() {
        let mut list = abc();
        // Pending row sits between B and C.
        let pending = Task::pending(EntityId::from("s1"), "draft");
        list.insert_at(2, pending);

        // Drag C (now index 3) up past the pending row: [A, B, C, pending]
        assert!(list.begin_drag(3));
        list.move_dragged(-1);

        match list.drop_dragged() {
            DropOutcome::Move(pos) => {
                assert_eq!(pos.item_id, EntityId::from("c"));
                // The pending row is invisible to the server: adjacency
                // skips it in both directions.
                assert_eq!(pos.before_id, Some(EntityId::from("b")));
                assert_eq!(pos.after_id, None);
            }
            other => panic!("expected Move, got {other:?}"),
        }
    }

    #[test]
    fn second_drag_refused_while_move_unconfirmed() {
        let mut list = abc();
        assert!(list.begin_drag(0));
        list.move_dragged(1);
        assert!(matches!(list.drop_dragged(), DropOutcome::Move(_)));

        // Unconfirmed move holds the snapshot: no new gesture yet.
        assert!(!list.begin_drag(0));
        list.confirm_move();
        assert!(list.begin_drag(0));
    }

    // ── ListSync: reconciliation ─────────────────────────────────────

    #[test]
    fn reconcile_replaces_on_any_difference() {
        let mut list = abc();
        let mut server = vec![
            task("a", "s1", "A", "1"),
            task("b", "s1", "B-renamed", "2"),
            task("c", "s1", "C", "3"),
        ];
        assert_eq!(list.reconcile(server.clone()), Reconcile::Replaced);
        assert_eq!(list.items()[1].name, "B-renamed");

        // Identical truth: clean pass, no churn.
        server[1].name = "B-renamed".into();
        assert_eq!(list.reconcile(server), Reconcile::Clean);
    }

    #[test]
    fn reconcile_detects_rank_changes() {
        let mut list = abc();
        let server = vec![
            task("a", "s1", "A", "1"),
            task("b", "s1", "B", "2.5"),
            task("c", "s1", "C", "3"),
        ];
        assert_eq!(list.reconcile(server), Reconcile::Replaced);
    }

    #[test]
    fn reconcile_suspended_during_drag() {
        let mut list = abc();
        assert!(list.begin_drag(0));
        list.move_dragged(2);

        let server = vec![task("x", "s1", "X", "1")];
        assert_eq!(list.reconcile(server), Reconcile::Suspended);
        // Gesture state untouched.
        assert_eq!(list.drag_index(), Some(2));
    }

    #[test]
    fn reconcile_suspended_while_move_in_flight() {
        let mut list = abc();
        assert!(list.begin_drag(0));
        list.move_dragged(1);
        assert!(matches!(list.drop_dragged(), DropOutcome::Move(_)));

        // A stale refresh must not clobber the optimistic order.
        let stale = vec![
            task("a", "s1", "A", "1"),
            task("b", "s1", "B", "2"),
            task("c", "s1", "C", "3"),
        ];
        assert_eq!(list.reconcile(stale), Reconcile::Suspended);

        list.confirm_move();
        let fresh = vec![
            task("b", "s1", "B", "1.5"),
            task("a", "s1", "A", "1"),
            task("c", "s1", "C", "3"),
        ];
        assert_eq!(list.reconcile(fresh), Reconcile::Replaced);
    }

    #[test]
    fn pending_insert_suspends_until_counterpart_arrives() {
        let mut list = abc();
        list.begin_insert(Task::pending(EntityId::from("s1"), "Setup CI"));
        assert_eq!(list.phase(), SyncPhase::PendingInsert);

        // Refresh that predates the create: the temp row must not vanish.
        let stale = vec![
            task("a", "s1", "A", "1"),
            task("b", "s1", "B", "2"),
            task("c", "s1", "C", "3"),
        ];
        assert_eq!(list.reconcile(stale), Reconcile::Suspended);
        assert_eq!(list.len(), 4);

        // The create landed: the persisted counterpart replaces the temp
        // row -- exactly one "Setup CI", no leftover artifact.
        let fresh = vec![
            task("a", "s1", "A", "1"),
            task("b", "s1", "B", "2"),
            task("c", "s1", "C", "3"),
            task("t_123", "s1", "Setup CI", "4"),
        ];
        assert_eq!(list.reconcile(fresh), Reconcile::Replaced);
        assert_eq!(list.len(), 4);
        assert_eq!(ids(&list), ["a", "b", "c", "t_123"]);
        assert_eq!(
            list.items()
                .iter()
                .filter(|t| t.name == "Setup CI")
                .count(),
            1
        );
        assert_eq!(list.phase(), SyncPhase::Synced);
    }

    #[test]
    fn aborted_insert_restores_pre_insert_state() {
        let mut list = abc();
        list.begin_insert(Task::pending(EntityId::from("s1"), "doomed"));
        let pending_id = list.items()[3].id.clone();

        // Create request failed: drop the temp row.
        list.remove_where(|t| t.id == pending_id);
        assert_eq!(ids(&list), ["a", "b", "c"]);
        assert_eq!(list.phase(), SyncPhase::Synced);
    }

    #[test]
    fn chained_moves_produce_consistent_adjacency() {
        // Property: after each confirmed move the local order is exactly
        // what the adjacency sent to the server implies.
        let mut list = abc();

        // Move A after B: [B, A, C]
        assert!(list.begin_drag(0));
        list.move_dragged(1);
        let DropOutcome::Move(pos) = list.drop_dragged() else {
            panic!("expected Move");
        };
        assert_eq!(pos.before_id, Some(EntityId::from("b")));
        assert_eq!(pos.after_id, Some(EntityId::from("c")));
        list.confirm_move();

        // Move C to the front: [C, B, A]
        assert!(list.begin_drag(2));
        list.move_dragged(-2);
        let DropOutcome::Move(pos) = list.drop_dragged() else {
            panic!("expected Move");
        };
        assert_eq!(pos.before_id, None);
        assert_eq!(pos.after_id, Some(EntityId::from("b")));
        list.confirm_move();

        assert_eq!(ids(&list), ["c", "b", "a"]);
    }

    // ── ListSync: single-row edits ───────────────────────────────────

    #[test]
    fn update_where_returns_pre_edit_snapshot() {
        let mut list = abc();
        let snapshot = list
            .update_where(
                |t| t.id.persisted() == Some(&EntityId::from("b")),
                |t| t.name = "B2".into(),
            )
            .unwrap();

        assert_eq!(snapshot.name, "B");
        assert_eq!(list.items()[1].name, "B2");

        // Rollback restores the exact row.
        assert!(list.restore(snapshot));
        assert_eq!(list.items()[1].name, "B");
    }

    // ── Board ────────────────────────────────────────────────────────

    fn board_with_two_sections() -> Board {
        let mut board = Board::new(EntityId::from("p1"));
        let snapshot = BoardSnapshot {
            sections: vec![section("s1", "TODO", "a"), section("s2", "Doing", "b")],
            tasks: vec![
                task("a", "s1", "A", "1"),
                task("b", "s1", "B", "2"),
                task("c", "s2", "C", "1"),
            ],
        };
        assert_eq!(board.reconcile(&snapshot), Reconcile::Replaced);
        board
    }

    #[test]
    fn board_reconcile_builds_columns_per_section() {
        let board = board_with_two_sections();
        assert_eq!(board.sections().len(), 2);
        assert_eq!(board.column(&EntityId::from("s1")).unwrap().len(), 2);
        assert_eq!(board.column(&EntityId::from("s2")).unwrap().len(), 1);
    }

    #[test]
    fn cross_section_drop_targets_destination_adjacency() {
        let mut board = board_with_two_sections();
        let s1 = EntityId::from("s1");
        let s2 = EntityId::from("s2");

        assert!(board.begin_task_drag(&s1, 1)); // grab B
        assert!(board.transfer_task_drag(&s2)); // carry into Doing

        match board.drop_task_drag() {
            TaskDropOutcome::Move(pos) => {
                assert_eq!(pos.task_id, EntityId::from("b"));
                assert_eq!(pos.section_id, s2);
                // B landed at index 1 of [C, B]: before C, after nothing.
                assert_eq!(pos.before_id, Some(EntityId::from("c")));
                assert_eq!(pos.after_id, None);
            }
            other => panic!("expected Move, got {other:?}"),
        }

        assert_eq!(board.column(&s1).unwrap().len(), 1);
        assert_eq!(board.column(&s2).unwrap().len(), 2);
    }

    #[test]
    fn failed_cross_section_move_rolls_back_both_columns() {
        let mut board = board_with_two_sections();
        let s1 = EntityId::from("s1");
        let s2 = EntityId::from("s2");

        assert!(board.begin_task_drag(&s1, 0));
        assert!(board.transfer_task_drag(&s2));
        assert!(matches!(
            board.drop_task_drag(),
            TaskDropOutcome::Move(_)
        ));

        board.rollback_task_move();

        assert_eq!(ids(board.column(&s1).unwrap()), ["a", "b"]);
        assert_eq!(ids(board.column(&s2).unwrap()), ["c"]);
    }

    #[test]
    fn board_reconcile_suspended_during_task_gesture() {
        let mut board = board_with_two_sections();
        let s1 = EntityId::from("s1");
        assert!(board.begin_task_drag(&s1, 0));

        let snapshot = BoardSnapshot::default();
        assert_eq!(board.reconcile(&snapshot), Reconcile::Suspended);
        // Columns untouched.
        assert_eq!(board.column(&s1).unwrap().len(), 2);
    }

    #[test]
    fn pending_task_cannot_change_sections() {
        let mut board = board_with_two_sections();
        let s1 = EntityId::from("s1");
        let s2 = EntityId::from("s2");

        board.begin_task_insert(&s1, "draft").unwrap();
        assert!(board.begin_task_drag(&s1, 2));
        assert!(!board.transfer_task_drag(&s2));
        assert_eq!(board.drop_task_drag(), TaskDropOutcome::LocalOnly);
    }

    #[test]
    fn task_insert_resolves_against_refreshed_board() {
        let mut board = board_with_two_sections();
        let s1 = EntityId::from("s1");

        board.begin_task_insert(&s1, "Setup CI").unwrap();
        assert_eq!(
            board.column(&s1).unwrap().phase(),
            SyncPhase::PendingInsert
        );

        let refreshed = BoardSnapshot {
            sections: vec![section("s1", "TODO", "a"), section("s2", "Doing", "b")],
            tasks: vec![
                task("a", "s1", "A", "1"),
                task("b", "s1", "B", "2"),
                task("t_123", "s1", "Setup CI", "3"),
                task("c", "s2", "C", "1"),
            ],
        };
        assert_eq!(board.reconcile(&refreshed), Reconcile::Replaced);

        let column = board.column(&s1).unwrap();
        assert_eq!(ids(column), ["a", "b", "t_123"]);
        assert_eq!(
            column
                .items()
                .iter()
                .filter(|t| t.name == "Setup CI")
                .count(),
            1
        );
    }

    #[test]
    fn vanished_section_drops_its_column() {
        let mut board = board_with_two_sections();
        let refreshed = BoardSnapshot {
            sections: vec![section("s1", "TODO", "a")],
            tasks: vec![task("a", "s1", "A", "1")],
        };
        board.reconcile(&refreshed);
        assert!(board.column(&EntityId::from("s2")).is_none());
    }

    #[test]
    fn section_reorder_flows_through_list_sync() {
        let mut board = board_with_two_sections();

        let sections = board.sections_mut();
        assert!(sections.begin_drag(1));
        sections.move_dragged(-1);
        match sections.drop_dragged() {
            DropOutcome::Move(pos) => {
                assert_eq!(pos.item_id, EntityId::from("s2"));
                assert_eq!(pos.before_id, None);
                assert_eq!(pos.after_id, Some(EntityId::from("s1")));
            }
            other => panic!("expected Move, got {other:?}"),
        }
    }
}
