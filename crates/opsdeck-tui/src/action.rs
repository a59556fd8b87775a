//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use opsdeck_core::board::{MovePosition, MoveTaskPosition};
use opsdeck_core::{
    BoardSnapshot, Command, EntityId, ItemId, Project, Promotion, Region, Role, SessionUser,
    Store, TaskUpdate, Ticket, TicketSummary, User,
};

use crate::screen::ScreenId;

/// Org screen sub-tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrgSubTab {
    #[default]
    Stores,
    Regions,
    Roles,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }
}

/// Pending confirmation action. Everything here is destructive -- the
/// row stays addressable until the mutation settles.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    DeleteStore { id: EntityId, name: String },
    DeleteRegion { id: EntityId, name: String },
    DeleteRole { id: EntityId, name: String },
    DeletePromotion { id: EntityId, title: String },
    DeleteTask {
        project: EntityId,
        id: EntityId,
        name: String,
    },
    ResetPassword { id: EntityId, username: String },
    CompleteTicket { id: EntityId, title: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteStore { name, .. } => write!(f, "Delete store {name}?"),
            Self::DeleteRegion { name, .. } => write!(f, "Delete region {name}?"),
            Self::DeleteRole { name, .. } => write!(f, "Delete role {name}?"),
            Self::DeletePromotion { title, .. } => write!(f, "Delete promotion {title}?"),
            Self::DeleteTask { name, .. } => {
                write!(f, "Delete task {name}? This cannot be undone.")
            }
            Self::ResetPassword { username, .. } => {
                write!(f, "Reset password for {username}?")
            }
            Self::CompleteTicket { title, .. } => write!(f, "Complete ticket {title}?"),
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),

    // ── Data Events (from opsdeck-core streams) ───────────────────
    UsersUpdated(Arc<Vec<Arc<User>>>),
    RolesUpdated(Arc<Vec<Arc<Role>>>),
    StoresUpdated(Arc<Vec<Arc<Store>>>),
    RegionsUpdated(Arc<Vec<Arc<Region>>>),
    TicketsUpdated(Arc<Vec<Arc<Ticket>>>),
    PromotionsUpdated(Arc<Vec<Arc<Promotion>>>),
    ProjectsUpdated(Arc<Vec<Arc<Project>>>),
    TicketSummaryUpdated(TicketSummary),
    BoardUpdated(EntityId, Arc<BoardSnapshot>),
    SessionUserUpdated(Option<Arc<SessionUser>>),

    // ── Connection Status ─────────────────────────────────────────
    Connected,
    Disconnected(String),
    Reconnecting,

    // ── Generic command pipeline ──────────────────────────────────
    /// Run a command in the background; settle with a notification.
    RunCommand {
        command: Command,
        success: Option<String>,
    },
    /// A `RunCommand` finished. Broadcast to all screens so dialog
    /// selection state can settle and busy flags clear.
    MutationSettled { ok: bool },

    // ── Board command pipeline (needs per-outcome handling) ───────
    /// Subscribe this session to a project's board cache.
    WatchBoard(EntityId),
    RequestMoveTask {
        project: EntityId,
        position: MoveTaskPosition,
    },
    TaskMoveSettled {
        ok: bool,
    },
    RequestMoveSection {
        project: EntityId,
        position: MovePosition,
    },
    SectionMoveSettled {
        ok: bool,
    },
    RequestCreateTask {
        project: EntityId,
        section: EntityId,
        name: String,
        pending: ItemId,
    },
    TaskCreateSettled {
        ok: bool,
        section: EntityId,
        pending: ItemId,
    },
    RequestEditTask {
        project: EntityId,
        section: EntityId,
        task: EntityId,
        update: TaskUpdate,
        ticket: u64,
    },
    TaskEditSettled {
        ok: bool,
        section: EntityId,
        task: EntityId,
        ticket: u64,
    },

    // ── User detail ───────────────────────────────────────────────
    /// Load a user's tickets; the generation tags the response so a
    /// stale load can't overwrite a newer one.
    RequestUserTickets(EntityId, u64),
    UserTicketsLoaded(EntityId, u64, Arc<Vec<Ticket>>),

    // ── Confirm Dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Help / Notifications ──────────────────────────────────────
    ToggleHelp,
    Notify(Notification),
    DismissNotification,
}
