//! Data bridge -- connects [Controller] streams to TUI actions.
//!
//! Runs as a background task: subscribes to entity streams and connection
//! state from the controller, forwarding every change as an [`Action`]
//! through the TUI's action channel. When the bridge is cancelled (app
//! shutdown), in-flight stream results are simply dropped -- nothing
//! touches screen state after unmount.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use opsdeck_core::{ConnectionState, Controller};

use crate::action::{Action, Notification};

/// Spawn the data bridge connecting [`Controller`] reactive streams to the TUI.
///
/// Connects to the server, sends initial data snapshots, then loops
/// forwarding every entity change and connection-state transition as an
/// [`Action`]. Shuts down cleanly on cancellation.
pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let _ = action_tx.send(Action::Reconnecting);

    if let Err(e) = controller.connect().await {
        warn!(error = %e, "failed to connect to server");
        let _ = action_tx.send(Action::Disconnected(format!("{e}")));
        let _ = action_tx.send(Action::Notify(Notification::error(format!("{e}"))));
        return;
    }

    let _ = action_tx.send(Action::Connected);

    // Subscribe to entity streams
    let mut users = controller.users();
    let mut roles = controller.roles();
    let mut stores = controller.stores();
    let mut regions = controller.regions();
    let mut tickets = controller.tickets();
    let mut promotions = controller.promotions();
    let mut projects = controller.projects();
    let mut summary = controller.store().subscribe_ticket_summary();
    let mut session_user = controller.session_user();
    let mut conn_state = controller.connection_state();

    // Push initial snapshots so screens have data immediately
    let _ = action_tx.send(Action::UsersUpdated(users.current().clone()));
    let _ = action_tx.send(Action::RolesUpdated(roles.current().clone()));
    let _ = action_tx.send(Action::StoresUpdated(stores.current().clone()));
    let _ = action_tx.send(Action::RegionsUpdated(regions.current().clone()));
    let _ = action_tx.send(Action::TicketsUpdated(tickets.current().clone()));
    let _ = action_tx.send(Action::PromotionsUpdated(promotions.current().clone()));
    let _ = action_tx.send(Action::ProjectsUpdated(projects.current().clone()));
    let _ = action_tx.send(Action::TicketSummaryUpdated(controller.ticket_summary()));
    let _ = action_tx.send(Action::SessionUserUpdated(controller.current_user()));

    // Stream loop -- forward every change until cancelled
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(u) = users.changed() => {
                let _ = action_tx.send(Action::UsersUpdated(u));
            }
            Some(r) = roles.changed() => {
                let _ = action_tx.send(Action::RolesUpdated(r));
            }
            Some(s) = stores.changed() => {
                let _ = action_tx.send(Action::StoresUpdated(s));
            }
            Some(r) = regions.changed() => {
                let _ = action_tx.send(Action::RegionsUpdated(r));
            }
            Some(t) = tickets.changed() => {
                let _ = action_tx.send(Action::TicketsUpdated(t));
            }
            Some(p) = promotions.changed() => {
                let _ = action_tx.send(Action::PromotionsUpdated(p));
            }
            Some(p) = projects.changed() => {
                let _ = action_tx.send(Action::ProjectsUpdated(p));
            }
            Ok(()) = summary.changed() => {
                let s = *summary.borrow_and_update();
                let _ = action_tx.send(Action::TicketSummaryUpdated(s));
            }
            Ok(()) = session_user.changed() => {
                let u = session_user.borrow_and_update().clone();
                let _ = action_tx.send(Action::SessionUserUpdated(u));
            }
            Ok(()) = conn_state.changed() => {
                let state = conn_state.borrow_and_update().clone();
                match state {
                    ConnectionState::Connected => {
                        let _ = action_tx.send(Action::Connected);
                    }
                    ConnectionState::Disconnected => {
                        let _ = action_tx.send(Action::Disconnected("disconnected".into()));
                    }
                    ConnectionState::Failed => {
                        let _ = action_tx.send(Action::Disconnected("session expired".into()));
                        let _ = action_tx.send(Action::Notify(Notification::warning(
                            "Session expired -- restart to log in again",
                        )));
                    }
                    ConnectionState::Connecting => {}
                }
            }
        }
    }

    controller.disconnect().await;
    debug!("data bridge shut down");
}

/// Watch one project's board cache, forwarding snapshots as actions.
///
/// One watcher is alive at a time (the board screen's current project);
/// switching projects cancels the previous watcher.
pub async fn watch_board(
    controller: Controller,
    project_id: opsdeck_core::EntityId,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut rx = controller.board(&project_id);

    // Send the current snapshot immediately (may be empty pre-fetch).
    let _ = action_tx.send(Action::BoardUpdated(
        project_id.clone(),
        rx.borrow().clone(),
    ));

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = rx.borrow_and_update().clone();
                let _ = action_tx.send(Action::BoardUpdated(project_id.clone(), snap));
            }
        }
    }

    debug!(project = %project_id, "board watcher shut down");
}
