// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The
// controller routes each variant to the appropriate API call and, on
// success, invalidates the cache key(s) the mutation affects.

pub mod requests;

use crate::board::{MovePosition, MoveTaskPosition};
use crate::error::CoreError;
use crate::model::{EntityId, Task, Ticket};

pub use requests::{PromotionDraft, RegionDraft, RoleDraft, StoreDraft, TaskUpdate};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All possible write operations against the admin API.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Users ────────────────────────────────────────────────────────
    ResetPassword {
        user_id: EntityId,
    },

    // ── Roles ────────────────────────────────────────────────────────
    CreateRole(RoleDraft),
    UpdateRole {
        id: EntityId,
        draft: RoleDraft,
    },
    DeleteRole {
        id: EntityId,
    },

    // ── Stores ───────────────────────────────────────────────────────
    CreateStore(StoreDraft),
    UpdateStore {
        id: EntityId,
        draft: StoreDraft,
    },
    DeleteStore {
        id: EntityId,
    },

    // ── Regions ──────────────────────────────────────────────────────
    CreateRegion(RegionDraft),
    UpdateRegion {
        id: EntityId,
        draft: RegionDraft,
    },
    DeleteRegion {
        id: EntityId,
    },

    // ── Tickets ──────────────────────────────────────────────────────
    RepairTicket {
        id: EntityId,
        assignee_id: Option<EntityId>,
        notes: Option<String>,
    },
    CompleteTicket {
        id: EntityId,
    },

    // ── Promotions ───────────────────────────────────────────────────
    CreatePromotion(PromotionDraft),
    UpdatePromotion {
        id: EntityId,
        draft: PromotionDraft,
    },
    DeletePromotion {
        id: EntityId,
    },

    // ── Board: tasks ─────────────────────────────────────────────────
    CreateTask {
        project_id: EntityId,
        section_id: EntityId,
        name: String,
    },
    UpdateTask {
        project_id: EntityId,
        task_id: EntityId,
        update: TaskUpdate,
    },
    DeleteTask {
        project_id: EntityId,
        task_id: EntityId,
    },
    MoveTask {
        project_id: EntityId,
        position: MoveTaskPosition,
    },

    // ── Board: sections ──────────────────────────────────────────────
    CreateSection {
        project_id: EntityId,
        name: String,
    },
    RenameSection {
        project_id: EntityId,
        section_id: EntityId,
        name: String,
    },
    MoveSection {
        project_id: EntityId,
        position: MovePosition,
    },

    // ── Board: subtasks ──────────────────────────────────────────────
    AddSubtask {
        project_id: EntityId,
        task_id: EntityId,
        name: String,
    },
    ToggleSubtask {
        project_id: EntityId,
        task_id: EntityId,
        subtask_id: EntityId,
        done: bool,
    },
    DeleteSubtask {
        project_id: EntityId,
        task_id: EntityId,
        subtask_id: EntityId,
    },

    // ── Board: attachments ───────────────────────────────────────────
    AddAttachment {
        project_id: EntityId,
        task_id: EntityId,
        file_name: String,
        size_bytes: u64,
    },
    DeleteAttachment {
        project_id: EntityId,
        task_id: EntityId,
        attachment_id: EntityId,
    },
}

/// Result payload of a successfully executed command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// Acknowledged; the cache invalidation carries the data.
    Ok,
    /// A new entity was created.
    Created(EntityId),
    /// The persisted task, as the server returned it.
    Task(Box<Task>),
    /// The updated ticket, as the server returned it.
    Ticket(Box<Ticket>),
}
