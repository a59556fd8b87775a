//! Reactive data layer between `opsdeck-api` and UI consumers (CLI / TUI).
//!
//! This crate owns the business logic, domain model, and the client-side
//! state-synchronization machinery for the opsdeck workspace:
//!
//! - **[`Controller`]** — Central facade managing the full lifecycle:
//!   [`connect()`](Controller::connect) authenticates, fetches an initial data
//!   snapshot, then spawns background tasks for periodic refresh and command
//!   processing. [`Controller::oneshot()`](Controller::oneshot) provides a
//!   lightweight fire-and-forget mode for single CLI invocations.
//!
//! - **[`DataStore`]** — Lock-free reactive cache built on
//!   `EntityCollection<T>` (`DashMap` + `tokio::sync::watch` channels), one
//!   collection per resource plus per-project board snapshots. Mutations
//!   invalidate their [`ResourceKey`] so subsequent reads observe the change.
//!
//! - **[`EntityStream<T>`]** — Subscription handle vended by the `DataStore`.
//!   Exposes `current()` / `latest()` / `changed()` for reactive rendering.
//!
//! - **[`Command`]** — Typed mutation requests routed through an `mpsc`
//!   channel to the controller's command processor. Reads bypass the channel
//!   via direct `DataStore` snapshots.
//!
//! - **[`board`]** — Ordered-list reconciliation for the project board:
//!   drag gestures, pending inserts, adjacency-based move requests, and
//!   rollback-exact snapshots.
//!
//! - **[`selection`]** — Per-screen dialog/selection state with destructive
//!   dialog row retention.

pub mod board;
pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod mutation;
pub mod selection;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{AuthCredentials, ServerConfig, TlsVerification};
pub use controller::{ConnectionState, Controller};
pub use error::CoreError;
pub use store::keys::{QueryRegistry, QueryState, ResourceKey};
pub use store::DataStore;
pub use stream::EntityStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Attachment,
    BoardSnapshot,
    EntityId,
    ItemId,
    Project,
    Promotion,
    Region,
    Role,
    Section,
    SessionUser,
    Store,
    Subtask,
    Task,
    TaskStatus,
    Ticket,
    TicketStatus,
    TicketSummary,
    User,
};
