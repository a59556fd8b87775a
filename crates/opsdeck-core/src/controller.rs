// ── Controller abstraction ──
//
// Full lifecycle management for a server connection. Handles
// authentication, background refresh, command routing, cache
// invalidation, and reactive data streaming through the DataStore.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{AuthCredentials, ServerConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{
    BoardSnapshot, EntityId, Project, Promotion, Region, Role, SessionUser, Store, Task, Ticket,
    TicketSummary, User,
};
use crate::store::keys::{QueryRegistry, QueryState, ResourceKey};
use crate::store::{DataStore, RefreshSnapshot};
use crate::stream::EntityStream;

use opsdeck_api::ApiClient;
use opsdeck_api::transport::{TlsMode, TransportConfig};

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// The session expired or the server became unreachable; background
    /// refresh has stopped.
    Failed,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Manages the full
/// connection lifecycle: authentication, background data refresh,
/// command routing, and reactive entity streaming.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ServerConfig,
    store: Arc<DataStore>,
    registry: QueryRegistry,
    connection_state: watch::Sender<ConnectionState>,
    session_user: watch::Sender<Option<Arc<SessionUser>>>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    api: Mutex<Option<ApiClient>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a new Controller from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to authenticate and start
    /// background tasks.
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(DataStore::new());
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (session_user, _) = watch::channel(None);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();

        Self {
            inner: Arc::new(ControllerInner {
                config,
                store,
                registry: QueryRegistry::new(),
                connection_state,
                session_user,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel,
                api: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Access the underlying DataStore.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to the server.
    ///
    /// Authenticates, performs an initial data refresh, and spawns
    /// background tasks (periodic refresh, command processor).
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        let config = &self.inner.config;
        let transport = build_transport(config);

        let client = ApiClient::new(config.url.clone(), &transport)?;

        let AuthCredentials::Credentials { username, password } = &config.auth;
        let login = client.login(username, password).await.inspect_err(|_| {
            let _ = self.inner.connection_state.send(ConnectionState::Failed);
        })?;
        debug!(%username, "session authentication successful");

        let _ = self
            .inner
            .session_user
            .send(Some(Arc::new(SessionUser::from(login))));

        *self.inner.api.lock().await = Some(client);

        // Initial data load
        self.full_refresh().await?;

        // Spawn background tasks
        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let ctrl = self.clone();
            handles.push(tokio::spawn(command_processor_task(ctrl, rx)));
        }

        let interval_secs = config.refresh_interval_secs;
        if interval_secs > 0 {
            let ctrl = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(refresh_task(ctrl, interval_secs, cancel)));
        }

        let _ = self.inner.connection_state.send(ConnectionState::Connected);
        info!("connected to server");
        Ok(())
    }

    /// Disconnect from the server.
    ///
    /// Cancels background tasks, logs out, and resets the connection
    /// state. In-flight refetches are cancelled; their results are
    /// discarded rather than written into the store.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        // Join all background tasks
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        if let Some(ref client) = *self.inner.api.lock().await {
            if let Err(e) = client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }

        *self.inner.api.lock().await = None;
        let _ = self.inner.session_user.send(None);
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Fetch all org-level data from the server and update the DataStore.
    ///
    /// Board data is fetched per project on demand (see
    /// [`invalidate`](Self::invalidate) with `ResourceKey::ProjectBoard`).
    pub async fn full_refresh(&self) -> Result<(), CoreError> {
        let api = self.api_handle().await?;

        let (users, roles, stores, regions, tickets, promotions, projects, summary) = tokio::join!(
            api.list_users(),
            api.list_roles(),
            api.list_stores(),
            api.list_regions(),
            api.list_tickets(),
            api.list_promotions(),
            api.list_projects(),
            api.ticket_summary(),
        );

        let snapshot = RefreshSnapshot {
            users: users?.into_iter().map(User::from).collect(),
            roles: roles?.into_iter().map(Role::from).collect(),
            stores: stores?.into_iter().map(Store::from).collect(),
            regions: regions?.into_iter().map(Region::from).collect(),
            tickets: tickets?.into_iter().map(Ticket::from).collect(),
            promotions: promotions?.into_iter().map(Promotion::from).collect(),
            projects: projects?.into_iter().map(Project::from).collect(),
            ticket_summary: summary?.into(),
        };

        self.inner.store.apply_full_snapshot(snapshot);

        debug!(
            users = self.inner.store.user_count(),
            tickets = self.inner.store.ticket_count(),
            "data refresh complete"
        );

        Ok(())
    }

    // ── Cache invalidation ───────────────────────────────────────

    /// Invalidate a cache key: spawn a refetch that replaces exactly
    /// that key's data. Concurrent invalidations of the same key are
    /// deduplicated; a failed refetch marks only its own key.
    pub fn invalidate(&self, key: ResourceKey) {
        if !self.inner.registry.begin(&key) {
            debug!(%key, "refetch already in flight, deduplicated");
            return;
        }

        let ctrl = self.clone();
        let cancel = self.inner.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    // Unmounting/disconnecting: leave the key idle, the
                    // result would be discarded anyway.
                    ctrl.inner.registry.complete(&key);
                }
                result = ctrl.refetch(&key) => match result {
                    Ok(()) => ctrl.inner.registry.complete(&key),
                    Err(e) => {
                        warn!(%key, error = %e, "refetch failed");
                        ctrl.inner.registry.fail(&key, e.to_string());
                    }
                },
            }
        });
    }

    /// Read state for a cache key.
    pub fn query_state(&self, key: &ResourceKey) -> QueryState {
        self.inner.registry.state(key)
    }

    async fn refetch(&self, key: &ResourceKey) -> Result<(), CoreError> {
        let api = self.api_handle().await?;
        let store = &self.inner.store;

        match key {
            ResourceKey::Users => {
                let users = api.list_users().await?;
                store.apply_users(users.into_iter().map(User::from).collect());
            }
            ResourceKey::Roles => {
                let roles = api.list_roles().await?;
                store.apply_roles(roles.into_iter().map(Role::from).collect());
            }
            ResourceKey::Stores => {
                let stores = api.list_stores().await?;
                store.apply_stores(stores.into_iter().map(Store::from).collect());
            }
            ResourceKey::Regions => {
                let regions = api.list_regions().await?;
                store.apply_regions(regions.into_iter().map(Region::from).collect());
            }
            ResourceKey::Tickets => {
                let (tickets, summary) = tokio::join!(api.list_tickets(), api.ticket_summary());
                store.apply_tickets(tickets?.into_iter().map(Ticket::from).collect());
                store.apply_ticket_summary(summary?.into());
            }
            ResourceKey::Promotions => {
                let promotions = api.list_promotions().await?;
                store.apply_promotions(promotions.into_iter().map(Promotion::from).collect());
            }
            ResourceKey::Projects => {
                let projects = api.list_projects().await?;
                store.apply_projects(projects.into_iter().map(Project::from).collect());
            }
            ResourceKey::ProjectBoard(project_id) => {
                let board = api.project_board(project_id.as_str()).await?;
                store.apply_board(project_id, BoardSnapshot::from(board));
            }
        }
        Ok(())
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command against the server.
    ///
    /// Sends the command through the internal channel to the command
    /// processor task and awaits the result. On success the processor
    /// has already invalidated the affected cache key(s).
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::Disconnected);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::Disconnected)?;

        rx.await.map_err(|_| CoreError::Disconnected)?
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Optimized for CLI: disables periodic refresh since we only need
    /// a single request-response cycle.
    pub async fn oneshot<F, Fut, T>(config: ServerConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;

        let controller = Controller::new(cfg);
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    /// Subscribe to the authenticated principal.
    pub fn session_user(&self) -> watch::Receiver<Option<Arc<SessionUser>>> {
        self.inner.session_user.subscribe()
    }

    /// The authenticated principal right now.
    pub fn current_user(&self) -> Option<Arc<SessionUser>> {
        self.inner.session_user.borrow().clone()
    }

    // ── Snapshot accessors (delegate to DataStore) ───────────────

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.inner.store.users_snapshot()
    }

    pub fn roles_snapshot(&self) -> Arc<Vec<Arc<Role>>> {
        self.inner.store.roles_snapshot()
    }

    pub fn stores_snapshot(&self) -> Arc<Vec<Arc<Store>>> {
        self.inner.store.stores_snapshot()
    }

    pub fn regions_snapshot(&self) -> Arc<Vec<Arc<Region>>> {
        self.inner.store.regions_snapshot()
    }

    pub fn tickets_snapshot(&self) -> Arc<Vec<Arc<Ticket>>> {
        self.inner.store.tickets_snapshot()
    }

    pub fn promotions_snapshot(&self) -> Arc<Vec<Arc<Promotion>>> {
        self.inner.store.promotions_snapshot()
    }

    pub fn projects_snapshot(&self) -> Arc<Vec<Arc<Project>>> {
        self.inner.store.projects_snapshot()
    }

    pub fn board_snapshot(&self, project_id: &EntityId) -> Arc<BoardSnapshot> {
        self.inner.store.board_snapshot(project_id)
    }

    pub fn ticket_summary(&self) -> TicketSummary {
        self.inner.store.ticket_summary()
    }

    // ── Stream accessors (delegate to DataStore) ─────────────────

    pub fn users(&self) -> EntityStream<User> {
        self.inner.store.subscribe_users()
    }

    pub fn roles(&self) -> EntityStream<Role> {
        self.inner.store.subscribe_roles()
    }

    pub fn stores(&self) -> EntityStream<Store> {
        self.inner.store.subscribe_stores()
    }

    pub fn regions(&self) -> EntityStream<Region> {
        self.inner.store.subscribe_regions()
    }

    pub fn tickets(&self) -> EntityStream<Ticket> {
        self.inner.store.subscribe_tickets()
    }

    pub fn promotions(&self) -> EntityStream<Promotion> {
        self.inner.store.subscribe_promotions()
    }

    pub fn projects(&self) -> EntityStream<Project> {
        self.inner.store.subscribe_projects()
    }

    pub fn board(&self, project_id: &EntityId) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.inner.store.subscribe_board(project_id)
    }

    // ── Ad-hoc reads (bypass the cache) ──────────────────────────

    /// Re-fetch the authenticated principal from the server and refresh
    /// the session-user watch.
    pub async fn refresh_session_user(&self) -> Result<Arc<SessionUser>, CoreError> {
        let api = self.api_handle().await?;
        let info = api.user_info().await?;
        let user = Arc::new(SessionUser::from(info));
        let _ = self.inner.session_user.send(Some(Arc::clone(&user)));
        Ok(user)
    }

    /// A single project's detail record; not cached.
    pub async fn project_detail(&self, project_id: &EntityId) -> Result<Project, CoreError> {
        let api = self.api_handle().await?;
        let project = api.project_detail(project_id.as_str()).await?;
        Ok(Project::from(project))
    }

    /// Tickets for a single user; not cached (detail drill-down).
    pub async fn tickets_by_user(&self, user_id: &EntityId) -> Result<Vec<Ticket>, CoreError> {
        let api = self.api_handle().await?;
        let tickets = api.tickets_by_user(user_id.as_str()).await?;
        Ok(tickets.into_iter().map(Ticket::from).collect())
    }

    /// Attachments of a task; not cached (detail drill-down).
    pub async fn task_attachments(
        &self,
        project_id: &EntityId,
        task_id: &EntityId,
    ) -> Result<Vec<crate::model::Attachment>, CoreError> {
        let api = self.api_handle().await?;
        let attachments = api
            .list_attachments(project_id.as_str(), task_id.as_str())
            .await?;
        Ok(attachments
            .into_iter()
            .map(crate::model::Attachment::from)
            .collect())
    }

    // ── Private helpers ──────────────────────────────────────────

    async fn api_handle(&self) -> Result<ApiClient, CoreError> {
        self.inner
            .api
            .lock()
            .await
            .as_ref()
            .cloned()
            .ok_or(CoreError::Disconnected)
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh data from the server. Stops (and flags the
/// connection) when the session expires.
async fn refresh_task(controller: Controller, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match controller.full_refresh().await {
                    Ok(()) => {}
                    Err(e @ CoreError::AuthenticationFailed { .. }) => {
                        warn!(error = %e, "session expired, stopping refresh");
                        let _ = controller
                            .inner
                            .connection_state
                            .send(ConnectionState::Failed);
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "periodic refresh failed");
                    }
                }
            }
        }
    }
}

/// Process commands from the mpsc channel, routing each to the
/// appropriate API call and invalidating affected cache keys.
async fn command_processor_task(controller: Controller, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = controller.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&controller, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

/// Route a command to the API and invalidate the cache key(s) the
/// mutation affects. Draft validation happens here, before any network
/// call -- an invalid draft never leaves the process.
#[allow(clippy::too_many_lines)]
async fn route_command(controller: &Controller, cmd: Command) -> Result<CommandResult, CoreError> {
    let api = controller.api_handle().await?;

    match cmd {
        // ── Users ────────────────────────────────────────────────
        Command::ResetPassword { user_id } => {
            api.reset_password(user_id.as_str()).await?;
            controller.invalidate(ResourceKey::Users);
            Ok(CommandResult::Ok)
        }

        // ── Roles ────────────────────────────────────────────────
        Command::CreateRole(draft) => {
            draft.validate()?;
            let created = api.create_role(&(&draft).into()).await?;
            controller.invalidate(ResourceKey::Roles);
            Ok(CommandResult::Created(EntityId::from(created.id)))
        }

        Command::UpdateRole { id, draft } => {
            draft.validate()?;
            api.update_role(id.as_str(), &(&draft).into()).await?;
            controller.invalidate(ResourceKey::Roles);
            Ok(CommandResult::Ok)
        }

        Command::DeleteRole { id } => {
            api.delete_role(id.as_str()).await?;
            controller.invalidate(ResourceKey::Roles);
            Ok(CommandResult::Ok)
        }

        // ── Stores ───────────────────────────────────────────────
        Command::CreateStore(draft) => {
            draft.validate()?;
            let created = api.create_store(&(&draft).into()).await?;
            controller.invalidate(ResourceKey::Stores);
            Ok(CommandResult::Created(EntityId::from(created.id)))
        }

        Command::UpdateStore { id, draft } => {
            draft.validate()?;
            api.update_store(id.as_str(), &(&draft).into()).await?;
            controller.invalidate(ResourceKey::Stores);
            Ok(CommandResult::Ok)
        }

        Command::DeleteStore { id } => {
            api.delete_store(id.as_str()).await?;
            controller.invalidate(ResourceKey::Stores);
            Ok(CommandResult::Ok)
        }

        // ── Regions ──────────────────────────────────────────────
        Command::CreateRegion(draft) => {
            draft.validate()?;
            let created = api.create_region(&(&draft).into()).await?;
            controller.invalidate(ResourceKey::Regions);
            Ok(CommandResult::Created(EntityId::from(created.id)))
        }

        Command::UpdateRegion { id, draft } => {
            draft.validate()?;
            api.update_region(id.as_str(), &(&draft).into()).await?;
            controller.invalidate(ResourceKey::Regions);
            Ok(CommandResult::Ok)
        }

        Command::DeleteRegion { id } => {
            api.delete_region(id.as_str()).await?;
            controller.invalidate(ResourceKey::Regions);
            Ok(CommandResult::Ok)
        }

        // ── Tickets ──────────────────────────────────────────────
        Command::RepairTicket {
            id,
            assignee_id,
            notes,
        } => {
            let body = opsdeck_api::models::RepairBody {
                assignee_id: assignee_id.as_ref().map(ToString::to_string),
                notes,
            };
            let ticket = api.repair_ticket(id.as_str(), &body).await?;
            controller.invalidate(ResourceKey::Tickets);
            Ok(CommandResult::Ticket(Box::new(Ticket::from(ticket))))
        }

        Command::CompleteTicket { id } => {
            let ticket = api.complete_ticket(id.as_str()).await?;
            controller.invalidate(ResourceKey::Tickets);
            Ok(CommandResult::Ticket(Box::new(Ticket::from(ticket))))
        }

        // ── Promotions ───────────────────────────────────────────
        Command::CreatePromotion(draft) => {
            draft.validate()?;
            let created = api.create_promotion(&(&draft).into()).await?;
            controller.invalidate(ResourceKey::Promotions);
            Ok(CommandResult::Created(EntityId::from(created.id)))
        }

        Command::UpdatePromotion { id, draft } => {
            draft.validate()?;
            api.update_promotion(id.as_str(), &(&draft).into()).await?;
            controller.invalidate(ResourceKey::Promotions);
            Ok(CommandResult::Ok)
        }

        Command::DeletePromotion { id } => {
            api.delete_promotion(id.as_str()).await?;
            controller.invalidate(ResourceKey::Promotions);
            Ok(CommandResult::Ok)
        }

        // ── Board: tasks ─────────────────────────────────────────
        Command::CreateTask {
            project_id,
            section_id,
            name,
        } => {
            if name.trim().is_empty() {
                return Err(CoreError::ValidationFailed {
                    message: "task name must not be empty".into(),
                });
            }
            let body = opsdeck_api::models::TaskCreateBody {
                section_id: section_id.to_string(),
                name,
            };
            let task = api.create_task(project_id.as_str(), &body).await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Task(Box::new(Task::from(task))))
        }

        Command::UpdateTask {
            project_id,
            task_id,
            update,
        } => {
            update.validate()?;
            let task = api
                .update_task(project_id.as_str(), task_id.as_str(), &(&update).into())
                .await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Task(Box::new(Task::from(task))))
        }

        Command::DeleteTask {
            project_id,
            task_id,
        } => {
            api.delete_task(project_id.as_str(), task_id.as_str())
                .await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Ok)
        }

        Command::MoveTask {
            project_id,
            position,
        } => {
            api.move_task(
                project_id.as_str(),
                position.task_id.as_str(),
                &(&position).into(),
            )
            .await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Ok)
        }

        // ── Board: sections ──────────────────────────────────────
        Command::CreateSection { project_id, name } => {
            if name.trim().is_empty() {
                return Err(CoreError::ValidationFailed {
                    message: "section name must not be empty".into(),
                });
            }
            let body = opsdeck_api::models::NameBody { name };
            let created = api.create_section(project_id.as_str(), &body).await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Created(EntityId::from(created.id)))
        }

        Command::RenameSection {
            project_id,
            section_id,
            name,
        } => {
            if name.trim().is_empty() {
                return Err(CoreError::ValidationFailed {
                    message: "section name must not be empty".into(),
                });
            }
            let body = opsdeck_api::models::NameBody { name };
            api.rename_section(project_id.as_str(), section_id.as_str(), &body)
                .await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Ok)
        }

        Command::MoveSection {
            project_id,
            position,
        } => {
            api.move_section(
                project_id.as_str(),
                position.item_id.as_str(),
                &(&position).into(),
            )
            .await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Ok)
        }

        // ── Board: subtasks ──────────────────────────────────────
        Command::AddSubtask {
            project_id,
            task_id,
            name,
        } => {
            let body = opsdeck_api::models::NameBody { name };
            let created = api
                .add_subtask(project_id.as_str(), task_id.as_str(), &body)
                .await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Created(EntityId::from(created.id)))
        }

        Command::ToggleSubtask {
            project_id,
            task_id,
            subtask_id,
            done,
        } => {
            api.toggle_subtask(
                project_id.as_str(),
                task_id.as_str(),
                subtask_id.as_str(),
                done,
            )
            .await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Ok)
        }

        Command::DeleteSubtask {
            project_id,
            task_id,
            subtask_id,
        } => {
            api.delete_subtask(project_id.as_str(), task_id.as_str(), subtask_id.as_str())
                .await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Ok)
        }

        // ── Board: attachments ───────────────────────────────────
        Command::AddAttachment {
            project_id,
            task_id,
            file_name,
            size_bytes,
        } => {
            let body = opsdeck_api::models::AttachmentBody {
                file_name,
                size_bytes,
            };
            let created = api
                .add_attachment(project_id.as_str(), task_id.as_str(), &body)
                .await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Created(EntityId::from(created.id)))
        }

        Command::DeleteAttachment {
            project_id,
            task_id,
            attachment_id,
        } => {
            api.delete_attachment(
                project_id.as_str(),
                task_id.as_str(),
                attachment_id.as_str(),
            )
            .await?;
            controller.invalidate(ResourceKey::ProjectBoard(project_id));
            Ok(CommandResult::Ok)
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Build a [`TransportConfig`] from the server configuration.
fn build_transport(config: &ServerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        cookie_jar: None, // ApiClient::new adds one automatically
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
