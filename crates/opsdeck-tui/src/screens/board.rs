//! Project board screen -- sections as columns, tasks as rows, with
//! keyboard-driven drag and drop.
//!
//! Local view state lives in an [`opsdeck_core::board::Board`]; this
//! screen owns it exclusively. Cache snapshots arrive as
//! `Action::BoardUpdated` and reconcile through the board's state
//! machine, so an in-flight gesture or unsaved row is never clobbered.
//!
//! Gesture keys: Space grabs the selected task, j/k move it within the
//! column, h/l carry it across sections, Space/Enter drops it (issuing
//! the adjacency-based move request), Esc cancels.

use std::collections::HashMap;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use opsdeck_core::board::{Board, DropOutcome, TaskDropOutcome};
use opsdeck_core::mutation::Revisions;
use opsdeck_core::{EntityId, Project, Task, TaskStatus, TaskUpdate};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::theme;

/// What the open text input is for.
#[derive(Debug, Clone)]
enum InputPurpose {
    NewTask { section: EntityId },
    RenameTask { section: EntityId, task: EntityId },
    NewSection,
    RenameSection { section: EntityId },
}

struct InputState {
    purpose: InputPurpose,
    input: Input,
    title: &'static str,
}

pub struct BoardScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    projects: Arc<Vec<Arc<Project>>>,
    project_id: Option<EntityId>,
    board: Board,
    /// Per-task edit guard: stale completions must not clobber newer
    /// optimistic state.
    revisions: Revisions,
    /// Pre-edit snapshots for in-flight single-row edits, keyed by task.
    pending_edits: HashMap<EntityId, (u64, Task)>,
    /// Selected column (index into the section list).
    col_idx: usize,
    /// Selected row within the column.
    row_idx: usize,
    /// A move request is in flight; grabbing is disabled until it settles.
    move_busy: bool,
    input: Option<InputState>,
}

impl BoardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            projects: Arc::new(Vec::new()),
            project_id: None,
            board: Board::new(EntityId::from("")),
            revisions: Revisions::new(),
            pending_edits: HashMap::new(),
            col_idx: 0,
            row_idx: 0,
            move_busy: false,
            input: None,
        }
    }

    fn section_id_at(&self, col: usize) -> Option<EntityId> {
        self.board.sections().get(col).map(|s| s.id.clone())
    }

    fn selected_section_id(&self) -> Option<EntityId> {
        self.section_id_at(self.col_idx)
    }

    fn selected_task(&self) -> Option<&Task> {
        let section = self.board.sections().get(self.col_idx)?;
        self.board.column(&section.id)?.get(self.row_idx)
    }

    fn clamp_selection(&mut self) {
        let sections = self.board.sections().len();
        if sections == 0 {
            self.col_idx = 0;
            self.row_idx = 0;
            return;
        }
        self.col_idx = self.col_idx.min(sections - 1);
        let len = self
            .selected_section_id()
            .and_then(|id| self.board.column(&id).map(|c| c.len()))
            .unwrap_or(0);
        self.row_idx = if len == 0 { 0 } else { self.row_idx.min(len - 1) };
    }

    fn open_project(&mut self, id: EntityId) -> Option<Action> {
        self.project_id = Some(id.clone());
        self.board = Board::new(id.clone());
        self.pending_edits.clear();
        self.col_idx = 0;
        self.row_idx = 0;
        self.move_busy = false;
        Some(Action::WatchBoard(id))
    }

    fn cycle_project(&mut self) -> Option<Action> {
        if self.projects.is_empty() {
            return None;
        }
        let current = self
            .project_id
            .as_ref()
            .and_then(|id| self.projects.iter().position(|p| &p.id == id))
            .unwrap_or(0);
        let next = (current + 1) % self.projects.len();
        let id = self.projects[next].id.clone();
        self.open_project(id)
    }

    fn open_input(&mut self, purpose: InputPurpose, title: &'static str, initial: &str) {
        self.input = Some(InputState {
            purpose,
            input: Input::new(initial.to_owned()),
            title,
        });
    }

    /// Apply an optimistic single-row edit and issue the request.
    fn edit_task(&mut self, update: TaskUpdate, f: impl FnOnce(&mut Task)) -> Option<Action> {
        let project = self.project_id.clone()?;
        let section = self.selected_section_id()?;
        let task_id = self.selected_task()?.id.persisted()?.clone();

        let ticket = self.revisions.begin(&task_id);
        let snapshot = self.board.update_task(&section, &task_id, f)?;
        self.pending_edits.insert(task_id.clone(), (ticket, snapshot));

        Some(Action::RequestEditTask {
            project,
            section,
            task: task_id,
            update,
            ticket,
        })
    }

    // ── Key handling ─────────────────────────────────────────────────

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Action> {
        let state = self.input.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.input = None;
                None
            }
            KeyCode::Enter => {
                let value = state.input.value().trim().to_owned();
                let purpose = state.purpose.clone();
                self.input = None;
                if value.is_empty() {
                    return None;
                }
                self.submit_input(purpose, value)
            }
            _ => {
                state.input.handle_event(&crossterm::event::Event::Key(key));
                None
            }
        }
    }

    fn submit_input(&mut self, purpose: InputPurpose, value: String) -> Option<Action> {
        let project = self.project_id.clone()?;
        match purpose {
            InputPurpose::NewTask { section } => {
                // Optimistic pending row; the create request follows.
                let pending = self.board.begin_task_insert(&section, value.clone())?;
                Some(Action::RequestCreateTask {
                    project,
                    section,
                    name: value,
                    pending,
                })
            }
            InputPurpose::RenameTask { section, task } => {
                let ticket = self.revisions.begin(&task);
                let snapshot = self.board.update_task(&section, &task, |t| {
                    t.name = value.clone();
                })?;
                self.pending_edits.insert(task.clone(), (ticket, snapshot));
                Some(Action::RequestEditTask {
                    project,
                    section,
                    task,
                    update: TaskUpdate::rename(value),
                    ticket,
                })
            }
            InputPurpose::NewSection => Some(Action::RunCommand {
                command: opsdeck_core::Command::CreateSection {
                    project_id: project,
                    name: value,
                },
                success: Some("Section created".into()),
            }),
            InputPurpose::RenameSection { section } => Some(Action::RunCommand {
                command: opsdeck_core::Command::RenameSection {
                    project_id: project,
                    section_id: section,
                    name: value,
                },
                success: None,
            }),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn handle_board_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Gesture mode: the grabbed task follows j/k/h/l.
        if self.board.is_task_dragging() {
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    self.board.move_task_drag(1);
                    if let Some((_, idx)) = self.board.task_drag() {
                        self.row_idx = idx;
                    }
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.board.move_task_drag(-1);
                    if let Some((_, idx)) = self.board.task_drag() {
                        self.row_idx = idx;
                    }
                }
                KeyCode::Char('h') | KeyCode::Left => {
                    if self.col_idx > 0 {
                        if let Some(target) = self.section_id_at(self.col_idx - 1) {
                            if self.board.transfer_task_drag(&target) {
                                self.col_idx -= 1;
                                if let Some((_, idx)) = self.board.task_drag() {
                                    self.row_idx = idx;
                                }
                            }
                        }
                    }
                }
                KeyCode::Char('l') | KeyCode::Right => {
                    if let Some(target) = self.section_id_at(self.col_idx + 1) {
                        if self.board.transfer_task_drag(&target) {
                            self.col_idx += 1;
                            if let Some((_, idx)) = self.board.task_drag() {
                                self.row_idx = idx;
                            }
                        }
                    }
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    match self.board.drop_task_drag() {
                        TaskDropOutcome::Move(position) => {
                            let project = self.project_id.clone()?;
                            self.move_busy = true;
                            return Some(Action::RequestMoveTask { project, position });
                        }
                        // Pending row or unchanged position: local only.
                        TaskDropOutcome::LocalOnly
                        | TaskDropOutcome::Unchanged
                        | TaskDropOutcome::NoDrag => {}
                    }
                }
                KeyCode::Esc => {
                    self.board.cancel_task_drag();
                    self.clamp_selection();
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            // ── Selection ────────────────────────────────────────────
            KeyCode::Char('j') | KeyCode::Down => {
                self.row_idx = self.row_idx.saturating_add(1);
                self.clamp_selection();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.row_idx = self.row_idx.saturating_sub(1);
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.col_idx = self.col_idx.saturating_sub(1);
                self.clamp_selection();
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.col_idx = self.col_idx.saturating_add(1);
                self.clamp_selection();
            }

            // ── Gesture start ────────────────────────────────────────
            KeyCode::Char(' ') => {
                if self.move_busy {
                    return None;
                }
                if let Some(section) = self.selected_section_id() {
                    self.board.begin_task_drag(&section, self.row_idx);
                }
            }

            // ── Task operations ──────────────────────────────────────
            KeyCode::Char('n') => {
                if let Some(section) = self.selected_section_id() {
                    self.open_input(InputPurpose::NewTask { section }, " New Task ", "");
                }
            }
            KeyCode::Char('r') => {
                let target = self.selected_task().and_then(|t| {
                    t.id.persisted()
                        .map(|id| (id.clone(), t.name.clone()))
                });
                if let (Some(section), Some((task, name))) =
                    (self.selected_section_id(), target)
                {
                    self.open_input(
                        InputPurpose::RenameTask { section, task },
                        " Rename Task ",
                        &name,
                    );
                }
            }
            KeyCode::Char('s') => {
                let next = self.selected_task().map(|t| match t.status {
                    TaskStatus::Todo => TaskStatus::Doing,
                    TaskStatus::Doing => TaskStatus::Done,
                    TaskStatus::Done => TaskStatus::Todo,
                })?;
                return self.edit_task(TaskUpdate::set_status(next), |t| {
                    t.status = next;
                });
            }
            KeyCode::Char('d') => {
                let project = self.project_id.clone()?;
                let target = self.selected_task().and_then(|t| {
                    t.id.persisted()
                        .map(|id| (id.clone(), t.name.clone()))
                });
                if let Some((id, name)) = target {
                    return Some(Action::ShowConfirm(ConfirmAction::DeleteTask {
                        project,
                        id,
                        name,
                    }));
                }
            }

            // ── Section operations ───────────────────────────────────
            KeyCode::Char('S') => {
                self.open_input(InputPurpose::NewSection, " New Section ", "");
            }
            KeyCode::Char('R') => {
                let target = self
                    .board
                    .sections()
                    .get(self.col_idx)
                    .map(|s| (s.id.clone(), s.name.clone()));
                if let Some((section, name)) = target {
                    self.open_input(
                        InputPurpose::RenameSection { section },
                        " Rename Section ",
                        &name,
                    );
                }
            }
            KeyCode::Char('<') => return self.nudge_section(-1),
            KeyCode::Char('>') => return self.nudge_section(1),

            // ── Project cycling ──────────────────────────────────────
            KeyCode::Char('p') => return self.cycle_project(),

            _ => {}
        }
        None
    }

    /// Move the selected section one slot left/right: a grab-move-drop
    /// in a single keypress, through the section list's state machine.
    fn nudge_section(&mut self, delta: isize) -> Option<Action> {
        if self.move_busy {
            return None;
        }
        let project = self.project_id.clone()?;
        let len = self.board.sections().len();
        let target = self
            .col_idx
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));

        let sections = self.board.sections_mut();
        if !sections.begin_drag(self.col_idx) {
            return None;
        }
        sections.move_dragged(delta);
        match sections.drop_dragged() {
            DropOutcome::Move(position) => {
                self.col_idx = target;
                self.clamp_selection();
                self.move_busy = true;
                Some(Action::RequestMoveSection { project, position })
            }
            DropOutcome::Unchanged | DropOutcome::LocalOnly | DropOutcome::NoDrag => None,
        }
    }
}

impl Component for BoardScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.input.is_some() {
            return Ok(self.handle_input_key(key));
        }
        Ok(self.handle_board_key(key))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ProjectsUpdated(projects) => {
                self.projects = Arc::clone(projects);
                // First project list: open the first project.
                if self.project_id.is_none() {
                    if let Some(first) = self.projects.first() {
                        let id = first.id.clone();
                        return Ok(self.open_project(id));
                    }
                }
            }

            Action::BoardUpdated(project, snapshot) => {
                if Some(project) == self.project_id.as_ref() {
                    self.board.reconcile(snapshot);
                    self.clamp_selection();
                }
            }

            Action::TaskMoveSettled { ok } => {
                self.move_busy = false;
                if *ok {
                    self.board.confirm_task_move();
                } else {
                    self.board.rollback_task_move();
                }
                self.clamp_selection();
            }

            Action::SectionMoveSettled { ok } => {
                self.move_busy = false;
                if *ok {
                    self.board.sections_mut().confirm_move();
                } else {
                    self.board.sections_mut().rollback();
                }
                self.clamp_selection();
            }

            Action::TaskCreateSettled {
                ok,
                section,
                pending,
            } => {
                if !ok {
                    self.board.abort_task_insert(section, pending);
                    self.clamp_selection();
                }
                // On success the pending row stays until the refreshed
                // board delivers its persisted counterpart.
            }

            Action::TaskEditSettled {
                ok,
                section: _,
                task,
                ticket,
            } => {
                if let Some((held, snapshot)) = self.pending_edits.get(task) {
                    // A stale settlement (a newer edit claimed the row)
                    // must not touch local state; its invalidation still
                    // reconciles from the cache.
                    if *held == *ticket && self.revisions.is_current(task, *ticket) {
                        let snapshot = snapshot.clone();
                        self.pending_edits.remove(task);
                        if !ok {
                            self.board.restore_task(snapshot);
                        }
                    }
                }
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
        "board"
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let project_name = self
            .project_id
            .as_ref()
            .and_then(|id| self.projects.iter().find(|p| &p.id == id))
            .map_or_else(|| "(no project)".to_owned(), |p| p.name.clone());

        let title = format!(" Board · {project_name} ");
        let block = Block::default()
            .title(title)
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
            Constraint::Min(1),    // columns
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let sections = self.board.sections().items();
        if sections.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  No sections yet -- press S to create one",
                    theme::key_hint(),
                ))),
                layout[0],
            );
        } else {
            let constraints: Vec<Constraint> = sections
                .iter()
                .map(|_| Constraint::Ratio(1, sections.len() as u32))
                .collect();
            let columns = Layout::horizontal(constraints).split(layout[0]);

            for (col, section) in sections.iter().enumerate() {
                if let Some(cell) = columns.get(col) {
                    self.render_column(frame, *cell, col, section);
                }
            }
        }

        let hints = if self.board.is_task_dragging() {
            " j/k move  h/l cross section  Space drop  Esc cancel"
        } else {
            " Space grab  n task  S section  r/R rename  s status  d delete  p project"
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hints, theme::key_hint()))),
            layout[1],
        );

        if let Some(input) = &self.input {
            render_input_dialog(frame, area, input);
        }
    }
}

impl BoardScreen {
    fn render_column(
        &self,
        frame: &mut Frame,
        area: Rect,
        col: usize,
        section: &opsdeck_core::Section,
    ) {
        let Some(column) = self.board.column(&section.id) else {
            return;
        };

        let selected_col = col == self.col_idx;
        let title = format!(" {} ({}) ", section.name, column.len());
        let block = Block::default()
            .title(title)
            .title_style(if selected_col {
                theme::title_style()
            } else {
                theme::tab_inactive()
            })
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if selected_col && self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let dragged_here = self
            .board
            .task_drag()
            .filter(|(sec, _)| **sec == section.id)
            .map(|(_, idx)| idx);

        let lines: Vec<Line> = column
            .items()
            .iter()
            .enumerate()
            .map(|(row, task)| {
                let icon = match task.status {
                    TaskStatus::Todo => "○",
                    TaskStatus::Doing => "◐",
                    TaskStatus::Done => "●",
                };
                let mut label = format!(" {icon} {}", task.name);
                if !task.subtasks.is_empty() {
                    label.push_str(&format!(
                        " ({}/{})",
                        task.done_subtasks(),
                        task.subtasks.len()
                    ));
                }
                if let Some(due) = task.due_date {
                    label.push_str(&format!("  {}", due.format("%m-%d")));
                }
                if task.id.is_pending() {
                    label.push_str("  …");
                }

                let style = if dragged_here == Some(row) {
                    theme::row_dragged()
                } else if task.id.is_pending() {
                    theme::row_pending()
                } else if selected_col && row == self.row_idx && self.focused {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                Line::from(Span::styled(label, style))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Render a one-line text input dialog centered on the screen.
fn render_input_dialog(frame: &mut Frame, area: Rect, state: &InputState) {
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
        .title(state.title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let line = Line::from(vec![
        Span::styled(" ", theme::key_hint()),
        Span::styled(state.input.value(), Style::default().fg(theme::DIM_WHITE)),
        Span::styled("█", Style::default().fg(theme::SEAFOAM)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
