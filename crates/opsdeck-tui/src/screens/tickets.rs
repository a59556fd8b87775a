//! Tickets screen -- live ticket table with status summary and the
//! repair/complete workflow.
//!
//! Completing a ticket is destructive (the customer is notified), so it
//! goes through the confirm dialog and the selected row stays addressable
//! until the mutation settles.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;

use opsdeck_core::selection::{DialogKind, SelectionState};
use opsdeck_core::{Command, EntityId, Ticket, TicketStatus, TicketSummary};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TicketDialog {
    Complete,
}

impl DialogKind for TicketDialog {
    fn is_destructive(&self) -> bool {
        true
    }
}

pub struct TicketsScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    tickets: Arc<Vec<Arc<Ticket>>>,
    sorted: Vec<Arc<Ticket>>,
    summary: TicketSummary,
    table_state: TableState,
    selection: SelectionState<EntityId, TicketDialog>,
    busy: bool,
}

impl TicketsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            tickets: Arc::new(Vec::new()),
            sorted: Vec::new(),
            summary: TicketSummary::default(),
            table_state: TableState::default(),
            selection: SelectionState::new(),
            busy: false,
        }
    }

    fn resort(&mut self) {
        let mut tickets: Vec<Arc<Ticket>> = self.tickets.iter().cloned().collect();
        tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        self.sorted = tickets;

        let len = self.sorted.len();
        if len > 0 && self.table_state.selected().unwrap_or(0) >= len {
            self.table_state.select(Some(len - 1));
        }
    }

    fn selected_ticket(&self) -> Option<&Arc<Ticket>> {
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

impl Component for TicketsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Char('g') => {
                self.table_state.select(Some(0));
                Ok(None)
            }
            KeyCode::Char('G') => {
                let len = self.sorted.len();
                if len > 0 {
                    self.table_state.select(Some(len - 1));
                }
                Ok(None)
            }
            // Repair: non-destructive, fires immediately.
            KeyCode::Char('r') => {
                if self.busy {
                    return Ok(None);
                }
                let Some(ticket) = self.selected_ticket() else {
                    return Ok(None);
                };
                if ticket.status != TicketStatus::Open {
                    return Ok(None);
                }
                let id = ticket.id.clone();
                let title = ticket.title.clone();
                self.busy = true;
                Ok(Some(Action::RunCommand {
                    command: Command::RepairTicket {
                        id,
                        assignee_id: None,
                        notes: None,
                    },
                    success: Some(format!("Repairing '{}'", title)),
                }))
            }
            // Complete: destructive, confirm first. The row is retained
            // until the mutation settles so the in-flight request has a
            // stable target.
            KeyCode::Char('c') => {
                if self.busy {
                    return Ok(None);
                }
                let Some(ticket) = self.selected_ticket() else {
                    return Ok(None);
                };
                if ticket.status != TicketStatus::Repairing
                    && ticket.status != TicketStatus::Open
                {
                    return Ok(None);
                }
                let id = ticket.id.clone();
                let title = ticket.title.clone();
                self.selection.open(TicketDialog::Complete, id.clone());
                self.busy = true;
                Ok(Some(Action::ShowConfirm(ConfirmAction::CompleteTicket {
                    id,
                    title,
                })))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::TicketsUpdated(tickets) => {
                self.tickets = Arc::clone(tickets);
                self.resort();
            }
            Action::TicketSummaryUpdated(summary) => {
                self.summary = *summary;
            }
            Action::MutationSettled { .. } => {
                // Dialog has closed (confirmed or dismissed); release the
                // retained row now that the mutation is settled.
                self.selection.close();
                self.selection.settle();
                self.busy = false;
            }
            _ => {}
        }
        Ok(None)
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "tickets"
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Tickets ({}) ", self.sorted.len()))
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

        let layout = Layout::vertical([
            Constraint::Length(1), // summary
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let summary_line = Line::from(vec![
            Span::styled(
                format!("  open {}", self.summary.open),
                ratatui::style::Style::default().fg(theme::AMBER),
            ),
            Span::styled(
                format!("   repairing {}", self.summary.repairing),
                ratatui::style::Style::default().fg(theme::HARBOR_BLUE),
            ),
            Span::styled(
                format!("   completed {}", self.summary.completed),
                ratatui::style::Style::default().fg(theme::SUCCESS_GREEN),
            ),
            Span::styled(
                format!("   closed {}", self.summary.closed),
                theme::key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(summary_line), layout[0]);

        let header = Row::new(vec![
            Cell::from("Title").style(theme::table_header()),
            Cell::from("Device").style(theme::table_header()),
            Cell::from("Customer").style(theme::table_header()),
            Cell::from("Status").style(theme::table_header()),
        ]);

        let in_flight = self.selection.current();
        let rows: Vec<Row> = self
            .sorted
            .iter()
            .map(|t| {
                let mut status = t.status.to_string();
                if in_flight == Some(&t.id) {
                    status.push_str(" …");
                }
                Row::new(vec![
                    Cell::from(t.title.clone()),
                    Cell::from(t.device.clone().unwrap_or_default()),
                    Cell::from(t.customer.clone().unwrap_or_default()),
                    Cell::from(status),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, layout[1], &mut state);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " r repair  c complete  j/k move",
                theme::key_hint(),
            ))),
            layout[2],
        );
    }
}
