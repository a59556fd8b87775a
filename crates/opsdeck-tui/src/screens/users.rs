//! Users screen -- account table with password reset and a per-user
//! ticket drill-down.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;

use opsdeck_core::mutation::Generation;
use opsdeck_core::selection::{DialogKind, SelectionState};
use opsdeck_core::{EntityId, Ticket, User};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserDialog {
    /// Ticket drill-down panel.
    Tickets,
    /// Password reset confirmation.
    ResetPassword,
}

impl DialogKind for UserDialog {
    fn is_destructive(&self) -> bool {
        matches!(self, Self::ResetPassword)
    }
}

pub struct UsersScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    users: Arc<Vec<Arc<User>>>,
    sorted: Vec<Arc<User>>,
    table_state: TableState,
    selection: SelectionState<EntityId, UserDialog>,
    user_tickets: Option<(EntityId, Arc<Vec<Ticket>>)>,
    /// Discards stale ticket loads when the drill-down switches users
    /// faster than responses arrive.
    ticket_load_gen: Generation,
    busy: bool,
}

impl UsersScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            users: Arc::new(Vec::new()),
            sorted: Vec::new(),
            table_state: TableState::default(),
            selection: SelectionState::new(),
            user_tickets: None,
            ticket_load_gen: Generation::new(),
            busy: false,
        }
    }

    fn resort(&mut self) {
        let mut users: Vec<Arc<User>> = self.users.iter().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        self.sorted = users;

        let len = self.sorted.len();
        if len > 0 && self.table_state.selected().unwrap_or(0) >= len {
            self.table_state.select(Some(len - 1));
        }
    }

    fn selected_user(&self) -> Option<&Arc<User>> {
        self.sorted.get(self.table_state.selected().unwrap_or(0))
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn move_selection(&mut self, delta: isize) {
        let len = self.sorted.len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }
}

impl Component for UsersScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ticket drill-down captures Esc to close.
        if self.selection.open_kind() == Some(UserDialog::Tickets) {
            if key.code == KeyCode::Esc {
                // Non-destructive: closing clears the row immediately.
                self.selection.close();
                self.user_tickets = None;
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Enter | KeyCode::Char('t') => {
                let Some(user) = self.selected_user() else {
                    return Ok(None);
                };
                let id = user.id.clone();
                self.selection.open(UserDialog::Tickets, id.clone());
                self.user_tickets = None;
                let generation = self.ticket_load_gen.next();
                Ok(Some(Action::RequestUserTickets(id, generation)))
            }
            KeyCode::Char('R') => {
                if self.busy {
                    return Ok(None);
                }
                let Some(user) = self.selected_user() else {
                    return Ok(None);
                };
                let id = user.id.clone();
                let username = user.username.clone();
                self.selection.open(UserDialog::ResetPassword, id.clone());
                self.busy = true;
                Ok(Some(Action::ShowConfirm(ConfirmAction::ResetPassword {
                    id,
                    username,
                })))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::UsersUpdated(users) => {
                self.users = Arc::clone(users);
                self.resort();
            }
            Action::UserTicketsLoaded(id, generation, tickets) => {
                // Discard stale responses: only the newest request for the
                // currently drilled-down user may land.
                if self.ticket_load_gen.is_current(*generation)
                    && self.selection.current() == Some(id)
                {
                    self.user_tickets = Some((id.clone(), Arc::clone(tickets)));
                }
            }
            Action::MutationSettled { .. } => {
                if self.selection.open_kind() == Some(UserDialog::ResetPassword)
                    || self.busy
                {
                    self.selection.close();
                    self.selection.settle();
                    self.busy = false;
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "users"
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Users ({}) ", self.sorted.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let detail_open = self.selection.open_kind() == Some(UserDialog::Tickets);
        let (table_area, detail_area) = if detail_open {
            let chunks =
                Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(table_area);

        let header = Row::new(vec![
            Cell::from("Username").style(theme::table_header()),
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Email").style(theme::table_header()),
            Cell::from("Enabled").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .sorted
            .iter()
            .map(|u| {
                Row::new(vec![
                    Cell::from(u.username.clone()),
                    Cell::from(u.display_name.clone().unwrap_or_default()),
                    Cell::from(u.email.clone().unwrap_or_default()),
                    Cell::from(if u.enabled { "yes" } else { "no" }),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(25),
                Constraint::Percentage(30),
                Constraint::Percentage(35),
                Constraint::Percentage(10),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, layout[0], &mut state);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Enter tickets  R reset password  j/k move",
                theme::key_hint(),
            ))),
            layout[1],
        );

        if let Some(detail) = detail_area {
            self.render_ticket_panel(frame, detail);
        }
    }
}

impl UsersScreen {
    fn render_ticket_panel(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Assigned Tickets (Esc to close) ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = match &self.user_tickets {
            None => vec![Line::from(Span::styled("  loading…", theme::key_hint()))],
            Some((_, tickets)) if tickets.is_empty() => {
                vec![Line::from(Span::styled("  no tickets", theme::key_hint()))]
            }
            Some((_, tickets)) => tickets
                .iter()
                .map(|t| {
                    Line::from(vec![
                        Span::styled(
                            format!("  [{}] ", t.status),
                            ratatui::style::Style::default().fg(theme::AMBER),
                        ),
                        Span::styled(t.title.clone(), theme::table_row()),
                    ])
                })
                .collect(),
        };

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
