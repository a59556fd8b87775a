// ── Projects, sections, tasks ──
//
// Ordering invariant: `rank` is an opaque server-assigned key. The client
// sorts by it and never fabricates one -- position changes travel as
// before/after adjacency, and the refreshed board carries the new ranks.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

use super::{EntityId, ItemId};

/// A project grouping board sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
}

/// A board column. Sections are always persisted -- creating one is a
/// confirm-then-refresh operation, not an optimistic insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: String,
    pub rank: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

/// A board task. `id` is an [`ItemId`]: tasks created locally carry a
/// pending identity until the create request resolves, and a pending task
/// never appears in a move or update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: ItemId,
    pub section_id: EntityId,
    pub name: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub rank: String,
    pub subtasks: Vec<Subtask>,
    pub attachment_count: u32,
}

impl Task {
    /// A blank local task awaiting its create request.
    pub fn pending(section_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: ItemId::fresh_pending(),
            section_id,
            name: name.into(),
            status: TaskStatus::Todo,
            due_date: None,
            rank: String::new(),
            subtasks: Vec::new(),
            attachment_count: 0,
        }
    }

    pub fn done_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.done).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subtask {
    pub id: EntityId,
    pub name: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub id: EntityId,
    pub task_id: EntityId,
    pub file_name: String,
    pub size_bytes: u64,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Server truth for a whole project board, cached per project.
/// Sections and tasks are sorted by rank at conversion time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardSnapshot {
    pub sections: Vec<Section>,
    pub tasks: Vec<Task>,
}

impl BoardSnapshot {
    /// Tasks belonging to a section, in rank order.
    pub fn tasks_in(&self, section_id: &EntityId) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| &t.section_id == section_id)
    }
}
