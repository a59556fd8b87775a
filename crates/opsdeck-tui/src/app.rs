//! Application core -- event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use opsdeck_core::{Command, Controller, ResourceKey};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// Connection status as seen by the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Top-level application state and event loop.
pub struct App {
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Connection status indicator.
    connection_status: ConnectionStatus,
    /// Help overlay visibility.
    help_visible: bool,
    /// Action sender -- components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver -- main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Controller for live data.
    controller: Controller,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Cancellation token for the current board watcher.
    board_watch_cancel: CancellationToken,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    /// Create a new App with all screens.
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            active_screen: ScreenId::Board,
            screens,
            running: true,
            connection_status: ConnectionStatus::default(),
            help_visible: false,
            action_tx,
            action_rx,
            controller,
            data_cancel: CancellationToken::new(),
            board_watch_cancel: CancellationToken::new(),
            pending_confirm: None,
            notification: None,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        // Spawn the data bridge
        {
            let controller = self.controller.clone();
            let cancel = self.data_cancel.clone();
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(controller, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event -> action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Cancel background tasks and clean up
        self.board_watch_cancel.cancel();
        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl+C always quits, even inside a text input.
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Confirmation dialog captures all input
        if self.pending_confirm.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Ok(Some(Action::ConfirmYes)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Ok(Some(Action::ConfirmNo)),
                _ => Ok(None),
            };
        }

        // A screen with an open text input gets every key.
        if self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.wants_exclusive_input())
        {
            if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                return screen.handle_key_event(key);
            }
            return Ok(None);
        }

        if self.help_visible {
            // In help mode, Esc or ? closes help
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='5')) => {
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            // Tab / Shift+Tab for screen cycling
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            _ => {}
        }

        // Delegate to active screen component
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action -- update app state and propagate to components.
    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            // Resize needs no bookkeeping: layout is recomputed per frame.
            Action::Resize(..) => {}

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} -> {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Connected => {
                self.connection_status = ConnectionStatus::Connected;
            }

            Action::Disconnected(_) => {
                self.connection_status = ConnectionStatus::Disconnected;
            }

            Action::Reconnecting => {
                self.connection_status = ConnectionStatus::Connecting;
            }

            Action::Render => {}

            Action::Tick => {
                // Auto-dismiss notifications after 3 seconds
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > Duration::from_secs(3) {
                        self.notification = None;
                    }
                }
            }

            // Data updates and settlement results go to ALL screens so
            // they stay in sync.
            Action::UsersUpdated(_)
            | Action::RolesUpdated(_)
            | Action::StoresUpdated(_)
            | Action::RegionsUpdated(_)
            | Action::TicketsUpdated(_)
            | Action::PromotionsUpdated(_)
            | Action::ProjectsUpdated(_)
            | Action::TicketSummaryUpdated(_)
            | Action::BoardUpdated(..)
            | Action::SessionUserUpdated(_)
            | Action::MutationSettled { .. }
            | Action::TaskMoveSettled { .. }
            | Action::SectionMoveSettled { .. }
            | Action::TaskCreateSettled { .. }
            | Action::TaskEditSettled { .. }
            | Action::UserTicketsLoaded(..) => {
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            // ── Command pipeline ──────────────────────────────────────
            Action::RunCommand { command, success } => {
                self.run_command(command.clone(), success.clone());
            }

            Action::WatchBoard(project_id) => {
                // Cancel the previous watcher, start a fresh one, and pull
                // the board through the cache.
                self.board_watch_cancel.cancel();
                self.board_watch_cancel = CancellationToken::new();

                let controller = self.controller.clone();
                let tx = self.action_tx.clone();
                let cancel = self.board_watch_cancel.clone();
                let project = project_id.clone();
                tokio::spawn(async move {
                    crate::data_bridge::watch_board(controller, project, tx, cancel).await;
                });

                self.controller
                    .invalidate(ResourceKey::ProjectBoard(project_id.clone()));
            }

            Action::RequestMoveTask { project, position } => {
                let command = Command::MoveTask {
                    project_id: project.clone(),
                    position: position.clone(),
                };
                self.run_board_command(command, |ok| Action::TaskMoveSettled { ok });
            }

            Action::RequestMoveSection { project, position } => {
                let command = Command::MoveSection {
                    project_id: project.clone(),
                    position: position.clone(),
                };
                self.run_board_command(command, |ok| Action::SectionMoveSettled { ok });
            }

            Action::RequestCreateTask {
                project,
                section,
                name,
                pending,
            } => {
                let command = Command::CreateTask {
                    project_id: project.clone(),
                    section_id: section.clone(),
                    name: name.clone(),
                };
                let section = section.clone();
                let pending = pending.clone();
                self.run_board_command(command, move |ok| Action::TaskCreateSettled {
                    ok,
                    section: section.clone(),
                    pending: pending.clone(),
                });
            }

            Action::RequestEditTask {
                project,
                section,
                task,
                update,
                ticket,
            } => {
                let command = Command::UpdateTask {
                    project_id: project.clone(),
                    task_id: task.clone(),
                    update: update.clone(),
                };
                let section = section.clone();
                let task = task.clone();
                let ticket = *ticket;
                self.run_board_command(command, move |ok| Action::TaskEditSettled {
                    ok,
                    section: section.clone(),
                    task: task.clone(),
                    ticket,
                });
            }

            Action::RequestUserTickets(user_id, generation) => {
                let controller = self.controller.clone();
                let tx = self.action_tx.clone();
                let user_id = user_id.clone();
                let generation = *generation;
                tokio::spawn(async move {
                    match controller.tickets_by_user(&user_id).await {
                        Ok(tickets) => {
                            let _ = tx.send(Action::UserTicketsLoaded(
                                user_id,
                                generation,
                                std::sync::Arc::new(tickets),
                            ));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::Notify(Notification::error(format!("{e}"))));
                        }
                    }
                });
            }

            // Confirmation dialog management
            Action::ShowConfirm(confirm) => {
                self.pending_confirm = Some(confirm.clone());
            }

            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }

            Action::ConfirmNo => {
                self.pending_confirm = None;
                // The dialog was dismissed without a mutation: let the
                // screens release their retained rows.
                self.action_tx.send(Action::MutationSettled { ok: false })?;
            }

            // Notifications
            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            Action::DismissNotification => {
                self.notification = None;
            }

            // Everything else goes to the active screen only
            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    // ── Command execution ─────────────────────────────────────────

    /// Spawn a command execution task. Sends MutationSettled plus a
    /// success/error notification on completion.
    fn run_command(&self, cmd: Command, success_msg: Option<String>) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match controller.execute(cmd).await {
                Ok(_) => {
                    let _ = tx.send(Action::MutationSettled { ok: true });
                    if let Some(msg) = success_msg {
                        let _ = tx.send(Action::Notify(Notification::success(msg)));
                    }
                }
                Err(e) => {
                    warn!(error = %e, "command execution failed");
                    let _ = tx.send(Action::MutationSettled { ok: false });
                    let _ = tx.send(Action::Notify(Notification::error(format!("{e}"))));
                }
            }
        });
    }

    /// Spawn a board command whose settlement the board screen must
    /// observe (confirm vs rollback of optimistic state).
    fn run_board_command(
        &self,
        cmd: Command,
        settle: impl FnOnce(bool) -> Action + Send + 'static,
    ) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match controller.execute(cmd).await {
                Ok(_) => {
                    let _ = tx.send(settle(true));
                }
                Err(e) => {
                    warn!(error = %e, "board command failed");
                    let _ = tx.send(settle(false));
                    let _ = tx.send(Action::Notify(Notification::error(format!("{e}"))));
                }
            }
        });
    }

    /// Map a confirmed action to its Command and execute it.
    fn execute_confirm(&self, action: ConfirmAction) {
        match action {
            ConfirmAction::DeleteStore { id, name } => {
                self.run_command(
                    Command::DeleteStore { id },
                    Some(format!("Deleted store {name}")),
                );
            }
            ConfirmAction::DeleteRegion { id, name } => {
                self.run_command(
                    Command::DeleteRegion { id },
                    Some(format!("Deleted region {name}")),
                );
            }
            ConfirmAction::DeleteRole { id, name } => {
                self.run_command(
                    Command::DeleteRole { id },
                    Some(format!("Deleted role {name}")),
                );
            }
            ConfirmAction::DeletePromotion { id, title } => {
                self.run_command(
                    Command::DeletePromotion { id },
                    Some(format!("Deleted promotion {title}")),
                );
            }
            ConfirmAction::DeleteTask { project, id, name } => {
                self.run_command(
                    Command::DeleteTask {
                        project_id: project,
                        task_id: id,
                    },
                    Some(format!("Deleted task {name}")),
                );
            }
            ConfirmAction::ResetPassword { id, username } => {
                self.run_command(
                    Command::ResetPassword { user_id: id },
                    Some(format!("Password reset for {username}")),
                );
            }
            ConfirmAction::CompleteTicket { id, title } => {
                self.run_command(
                    Command::CompleteTicket { id },
                    Some(format!("Completed {title}")),
                );
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        let content_area = layout[0];
        let tab_area = layout[1];
        let status_area = layout[2];

        // Render active screen
        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }

        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        // Render overlays on top (order matters: last = topmost)
        if let Some((ref notif, _)) = self.notification {
            self.render_notification(frame, area, notif);
        }

        if let Some(ref confirm) = self.pending_confirm {
            self.render_confirm_dialog(frame, area, confirm);
        }

        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    /// Render the bottom tab bar showing all screens.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Render the bottom status bar with connection status and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let connection_indicator = match &self.connection_status {
            ConnectionStatus::Connected => {
                Span::styled("● connected", Style::default().fg(theme::SUCCESS_GREEN))
            }
            ConnectionStatus::Disconnected => {
                Span::styled("○ disconnected", Style::default().fg(theme::ERROR_RED))
            }
            ConnectionStatus::Connecting => {
                Span::styled("◐ connecting", Style::default().fg(theme::AMBER))
            }
        };

        let hints = Span::styled(" │ ? help  1-5 screens  q quit", theme::key_hint());

        let line = Line::from(vec![Span::raw(" "), connection_indicator, hints]);

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render the help overlay centered on screen.
    #[allow(clippy::unused_self)]
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_width = 62u16.min(area.width.saturating_sub(4));
        let help_height = 20u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;

        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let help_text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "  Navigation",
                Style::default().fg(theme::HARBOR_BLUE),
            )]),
            Line::from(Span::styled("  ──────────", theme::key_hint())),
            Line::from(vec![
                Span::styled("  1-5       ", theme::key_hint_key()),
                Span::styled("Jump to screen", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Tab       ", theme::key_hint_key()),
                Span::styled("Next screen", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  j/k ↑/↓   ", theme::key_hint_key()),
                Span::styled("Move selection", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  h/l ←/→   ", theme::key_hint_key()),
                Span::styled("Switch column / sub-tab", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "  Board",
                Style::default().fg(theme::HARBOR_BLUE),
            )]),
            Line::from(Span::styled("  ─────", theme::key_hint())),
            Line::from(vec![
                Span::styled("  Space     ", theme::key_hint_key()),
                Span::styled("Grab / drop task      ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("Cancel drag", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  n/S       ", theme::key_hint_key()),
                Span::styled("New task / section    ", theme::key_hint()),
                Span::styled("r   ", theme::key_hint_key()),
                Span::styled("Rename", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  s         ", theme::key_hint_key()),
                Span::styled("Cycle status          ", theme::key_hint()),
                Span::styled("d   ", theme::key_hint_key()),
                Span::styled("Delete", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "                         Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Render a centered confirmation dialog.
    #[allow(clippy::unused_self)]
    fn render_confirm_dialog(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let width = 54u16.min(area.width.saturating_sub(4));
        let height = 5u16;

        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let dialog_area = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog_area,
        );

        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::AMBER));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Render a notification toast in the bottom-right corner.
    #[allow(clippy::unused_self, clippy::cast_possible_truncation)]
    fn render_notification(&self, frame: &mut Frame, area: Rect, notif: &Notification) {
        use crate::action::NotificationLevel;

        let msg_len = notif.message.len() as u16;
        let width = (msg_len + 6).clamp(20, 60);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above status bar
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Warning => (theme::AMBER, "!"),
            NotificationLevel::Info => (theme::HARBOR_BLUE, "·"),
        };

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(&notif.message, Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}
