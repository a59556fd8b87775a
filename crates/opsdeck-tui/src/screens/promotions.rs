//! Promotions screen -- the promotions table with quick activate/deactivate.

use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use opsdeck_core::selection::{DialogKind, SelectionState};
use opsdeck_core::{Command, EntityId, Promotion, PromotionDraft};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromoDialog {
    Delete,
}

impl DialogKind for PromoDialog {
    fn is_destructive(&self) -> bool {
        true
    }
}

pub struct PromotionsScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    promotions: Arc<Vec<Arc<Promotion>>>,
    sorted: Vec<Arc<Promotion>>,
    table_state: TableState,
    selection: SelectionState<EntityId, PromoDialog>,
    input: Option<Input>,
    busy: bool,
}

impl PromotionsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            promotions: Arc::new(Vec::new()),
            sorted: Vec::new(),
            table_state: TableState::default(),
            selection: SelectionState::new(),
            input: None,
            busy: false,
        }
    }

    fn resort(&mut self) {
        let mut promotions: Vec<Arc<Promotion>> = self.promotions.iter().cloned().collect();
        promotions.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));
        self.sorted = promotions;

        let len = self.sorted.len();
        if len > 0 && self.table_state.selected().unwrap_or(0) >= len {
            self.table_state.select(Some(len - 1));
        }
    }

    fn selected_promotion(&self) -> Option<&Arc<Promotion>> {
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

    fn draft_from(promotion: &Promotion, active: bool) -> PromotionDraft {
        PromotionDraft {
            title: promotion.title.clone(),
            body: promotion.body.clone(),
            starts_at: promotion.starts_at,
            ends_at: promotion.ends_at,
            active,
        }
    }
}

impl Component for PromotionsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(input) = self.input.as_mut() {
            return Ok(match key.code {
                KeyCode::Esc => {
                    self.input = None;
                    None
                }
                KeyCode::Enter => {
                    let title = input.value().trim().to_owned();
                    self.input = None;
                    if title.is_empty() {
                        None
                    } else {
                        self.busy = true;
                        Some(Action::RunCommand {
                            command: Command::CreatePromotion(PromotionDraft {
                                title,
                                body: None,
                                starts_at: None,
                                ends_at: None,
                                active: true,
                            }),
                            success: Some("Promotion created".into()),
                        })
                    }
                }
                _ => {
                    input.handle_event(&crossterm::event::Event::Key(key));
                    None
                }
            });
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
            KeyCode::Char('a') => {
                self.input = Some(Input::default());
                Ok(None)
            }
            KeyCode::Char('x') => {
                if self.busy {
                    return Ok(None);
                }
                let Some(promotion) = self.selected_promotion() else {
                    return Ok(None);
                };
                let id = promotion.id.clone();
                let draft = Self::draft_from(promotion, !promotion.active);
                self.busy = true;
                Ok(Some(Action::RunCommand {
                    command: Command::UpdatePromotion { id, draft },
                    success: None,
                }))
            }
            KeyCode::Char('d') => {
                if self.busy {
                    return Ok(None);
                }
                let Some(promotion) = self.selected_promotion() else {
                    return Ok(None);
                };
                let id = promotion.id.clone();
                let title = promotion.title.clone();
                self.selection.open(PromoDialog::Delete, id.clone());
                self.busy = true;
                Ok(Some(Action::ShowConfirm(ConfirmAction::DeletePromotion {
                    id,
                    title,
                })))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::PromotionsUpdated(promotions) => {
                self.promotions = Arc::clone(promotions);
                self.resort();
            }
            Action::MutationSettled { .. } => {
                self.selection.close();
                self.selection.settle();
                self.busy = false;
            }
            _ => {}
        }
        Ok(None)
    }

    fn wants_exclusive_input(&self) -> bool {
        self.input.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "promotions"
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Promotions ({}) ", self.sorted.len()))
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
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let now = Utc::now();
        let header = Row::new(vec![
            Cell::from("Title").style(theme::table_header()),
            Cell::from("Starts").style(theme::table_header()),
            Cell::from("Ends").style(theme::table_header()),
            Cell::from("Live").style(theme::table_header()),
        ]);

        let in_flight = self.selection.current();
        let rows: Vec<Row> = self
            .sorted
            .iter()
            .map(|p| {
                let mut title = p.title.clone();
                if in_flight == Some(&p.id) {
                    title.push_str(" …");
                }
                let fmt = |ts: Option<chrono::DateTime<Utc>>| {
                    ts.map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_default()
                };
                Row::new(vec![
                    Cell::from(title),
                    Cell::from(fmt(p.starts_at)),
                    Cell::from(fmt(p.ends_at)),
                    Cell::from(if p.is_live(now) { "●" } else { "○" }),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(55),
                Constraint::Percentage(18),
                Constraint::Percentage(18),
                Constraint::Percentage(9),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, layout[0], &mut state);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " a add  x activate/deactivate  d delete  j/k move",
                theme::key_hint(),
            ))),
            layout[1],
        );

        if let Some(input) = &self.input {
            render_input_dialog(frame, area, input);
        }
    }
}

fn render_input_dialog(frame: &mut Frame, area: Rect, input: &Input) {
    let width = 46u16.min(area.width.saturating_sub(4));
    let height = 3u16;
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let dialog_area = Rect::new(area.x + x, area.y + y, width, height);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        dialog_area,
    );

    let block = Block::default()
        .title(" New Promotion ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let line = Line::from(vec![
        Span::styled(" ", theme::key_hint()),
        Span::styled(input.value(), Style::default().fg(theme::DIM_WHITE)),
        Span::styled("█", Style::default().fg(theme::SEAFOAM)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
