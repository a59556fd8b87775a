//! Org screen -- stores, regions, and roles behind sub-tabs.
//!
//! Quick edits (add / rename / enable toggle / delete) happen here; the
//! CLI covers the long tail of fields. Deletes go through the confirm
//! dialog with row retention; adds and renames use a one-line input.

use std::sync::Arc;

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
use opsdeck_core::{
    Command, EntityId, Region, RegionDraft, Role, RoleDraft, Store, StoreDraft,
};

use crate::action::{Action, ConfirmAction, OrgSubTab};
use crate::component::Component;
use crate::theme;
use crate::widgets::sub_tabs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrgDialog {
    Delete,
}

impl DialogKind for OrgDialog {
    fn is_destructive(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy)]
enum InputPurpose {
    Add,
    Rename,
}

struct InputState {
    purpose: InputPurpose,
    input: Input,
}

pub struct OrgScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    sub_tab: OrgSubTab,
    stores: Arc<Vec<Arc<Store>>>,
    regions: Arc<Vec<Arc<Region>>>,
    roles: Arc<Vec<Arc<Role>>>,
    table_state: TableState,
    selection: SelectionState<EntityId, OrgDialog>,
    input: Option<InputState>,
    busy: bool,
}

impl OrgScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            sub_tab: OrgSubTab::default(),
            stores: Arc::new(Vec::new()),
            regions: Arc::new(Vec::new()),
            roles: Arc::new(Vec::new()),
            table_state: TableState::default(),
            selection: SelectionState::new(),
            input: None,
            busy: false,
        }
    }

    fn row_count(&self) -> usize {
        match self.sub_tab {
            OrgSubTab::Stores => self.stores.len(),
            OrgSubTab::Regions => self.regions.len(),
            OrgSubTab::Roles => self.roles.len(),
        }
    }

    fn sub_tab_index(&self) -> usize {
        match self.sub_tab {
            OrgSubTab::Stores => 0,
            OrgSubTab::Regions => 1,
            OrgSubTab::Roles => 2,
        }
    }

    fn cycle_sub_tab(&mut self, forward: bool) {
        self.sub_tab = if forward {
            match self.sub_tab {
                OrgSubTab::Stores => OrgSubTab::Regions,
                OrgSubTab::Regions => OrgSubTab::Roles,
                OrgSubTab::Roles => OrgSubTab::Stores,
            }
        } else {
            match self.sub_tab {
                OrgSubTab::Stores => OrgSubTab::Roles,
                OrgSubTab::Regions => OrgSubTab::Stores,
                OrgSubTab::Roles => OrgSubTab::Regions,
            }
        };
        self.table_state.select(Some(0));
    }

    /// Sorted rows for the active sub-tab as (id, name) pairs.
    fn current_rows(&self) -> Vec<(EntityId, String)> {
        let mut rows: Vec<(EntityId, String)> = match self.sub_tab {
            OrgSubTab::Stores => self
                .stores
                .iter()
                .map(|s| (s.id.clone(), s.name.clone()))
                .collect(),
            OrgSubTab::Regions => self
                .regions
                .iter()
                .map(|r| (r.id.clone(), r.name.clone()))
                .collect(),
            OrgSubTab::Roles => self
                .roles
                .iter()
                .map(|r| (r.id.clone(), r.name.clone()))
                .collect(),
        };
        rows.sort_by(|a, b| a.1.cmp(&b.1));
        rows
    }

    fn selected_row(&self) -> Option<(EntityId, String)> {
        self.current_rows()
            .into_iter()
            .nth(self.table_state.selected().unwrap_or(0))
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn move_selection(&mut self, delta: isize) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    fn store_by_id(&self, id: &EntityId) -> Option<Arc<Store>> {
        self.stores.iter().find(|s| &s.id == id).cloned()
    }

    /// Build the create/update command for an input submission.
    fn submit_input(&mut self, purpose: InputPurpose, value: String) -> Option<Action> {
        let command = match (purpose, self.sub_tab) {
            (InputPurpose::Add, OrgSubTab::Stores) => Command::CreateStore(StoreDraft {
                name: value,
                region_id: None,
                address: None,
                phone: None,
                enabled: true,
            }),
            (InputPurpose::Add, OrgSubTab::Regions) => {
                Command::CreateRegion(RegionDraft { name: value, code: None })
            }
            (InputPurpose::Add, OrgSubTab::Roles) => Command::CreateRole(RoleDraft {
                name: value,
                description: None,
                permissions: Vec::new(),
            }),
            (InputPurpose::Rename, tab) => {
                let (id, _) = self.selected_row()?;
                match tab {
                    OrgSubTab::Stores => {
                        let store = self.store_by_id(&id)?;
                        Command::UpdateStore {
                            id,
                            draft: StoreDraft {
                                name: value,
                                region_id: store.region_id.clone(),
                                address: store.address.clone(),
                                phone: store.phone.clone(),
                                enabled: store.enabled,
                            },
                        }
                    }
                    OrgSubTab::Regions => {
                        let region = self.regions.iter().find(|r| r.id == id)?.clone();
                        Command::UpdateRegion {
                            id,
                            draft: RegionDraft {
                                name: value,
                                code: region.code.clone(),
                            },
                        }
                    }
                    OrgSubTab::Roles => {
                        let role = self.roles.iter().find(|r| r.id == id)?.clone();
                        Command::UpdateRole {
                            id,
                            draft: RoleDraft {
                                name: value,
                                description: role.description.clone(),
                                permissions: role.permissions.clone(),
                            },
                        }
                    }
                }
            }
        };
        self.busy = true;
        Some(Action::RunCommand {
            command,
            success: None,
        })
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Action> {
        let state = self.input.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.input = None;
                None
            }
            KeyCode::Enter => {
                let value = state.input.value().trim().to_owned();
                let purpose = state.purpose;
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

    fn confirm_delete(&mut self) -> Option<Action> {
        let (id, name) = self.selected_row()?;
        self.selection.open(OrgDialog::Delete, id.clone());
        self.busy = true;
        let confirm = match self.sub_tab {
            OrgSubTab::Stores => ConfirmAction::DeleteStore { id, name },
            OrgSubTab::Regions => ConfirmAction::DeleteRegion { id, name },
            OrgSubTab::Roles => ConfirmAction::DeleteRole { id, name },
        };
        Some(Action::ShowConfirm(confirm))
    }

    /// Flip a store's enabled flag (stores sub-tab only).
    fn toggle_store(&mut self) -> Option<Action> {
        if self.sub_tab != OrgSubTab::Stores {
            return None;
        }
        let (id, _) = self.selected_row()?;
        let store = self.store_by_id(&id)?;
        self.busy = true;
        Some(Action::RunCommand {
            command: Command::UpdateStore {
                id,
                draft: StoreDraft {
                    name: store.name.clone(),
                    region_id: store.region_id.clone(),
                    address: store.address.clone(),
                    phone: store.phone.clone(),
                    enabled: !store.enabled,
                },
            },
            success: None,
        })
    }
}

impl Component for OrgScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.input.is_some() {
            return Ok(self.handle_input_key(key));
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
            KeyCode::Char('h') | KeyCode::Left => {
                self.cycle_sub_tab(false);
                Ok(None)
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.cycle_sub_tab(true);
                Ok(None)
            }
            KeyCode::Char('a') => {
                self.input = Some(InputState {
                    purpose: InputPurpose::Add,
                    input: Input::default(),
                });
                Ok(None)
            }
            KeyCode::Char('e') => {
                if let Some((_, name)) = self.selected_row() {
                    self.input = Some(InputState {
                        purpose: InputPurpose::Rename,
                        input: Input::new(name),
                    });
                }
                Ok(None)
            }
            KeyCode::Char('x') => {
                if self.busy {
                    return Ok(None);
                }
                Ok(self.toggle_store())
            }
            KeyCode::Char('d') => {
                if self.busy {
                    return Ok(None);
                }
                Ok(self.confirm_delete())
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StoresUpdated(stores) => {
                self.stores = Arc::clone(stores);
            }
            Action::RegionsUpdated(regions) => {
                self.regions = Arc::clone(regions);
            }
            Action::RolesUpdated(roles) => {
                self.roles = Arc::clone(roles);
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
        "org"
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Organization ")
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
            Constraint::Length(1), // sub-tabs
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let labels = &["Stores", "Regions", "Roles"];
        let tabs_line = sub_tabs::render_sub_tabs(labels, self.sub_tab_index());
        frame.render_widget(Paragraph::new(tabs_line), layout[0]);

        match self.sub_tab {
            OrgSubTab::Stores => self.render_stores(frame, layout[1]),
            OrgSubTab::Regions => self.render_regions(frame, layout[1]),
            OrgSubTab::Roles => self.render_roles(frame, layout[1]),
        }

        let hints = match self.sub_tab {
            OrgSubTab::Stores => " a add  e rename  x enable/disable  d delete  h/l tabs",
            _ => " a add  e rename  d delete  h/l tabs",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hints, theme::key_hint()))),
            layout[2],
        );

        if let Some(input) = &self.input {
            render_input_dialog(frame, area, input, self.sub_tab);
        }
    }
}

impl OrgScreen {
    fn render_stores(&self, frame: &mut Frame, area: Rect) {
        let mut stores: Vec<Arc<Store>> = self.stores.iter().cloned().collect();
        stores.sort_by(|a, b| a.name.cmp(&b.name));

        let header = Row::new(vec![
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Region").style(theme::table_header()),
            Cell::from("Phone").style(theme::table_header()),
            Cell::from("Enabled").style(theme::table_header()),
        ]);
        let in_flight = self.selection.current();
        let rows: Vec<Row> = stores
            .iter()
            .map(|s| {
                let mut name = s.name.clone();
                if in_flight == Some(&s.id) {
                    name.push_str(" …");
                }
                Row::new(vec![
                    Cell::from(name),
                    Cell::from(
                        s.region_id
                            .as_ref()
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                    ),
                    Cell::from(s.phone.clone().unwrap_or_default()),
                    Cell::from(if s.enabled { "yes" } else { "no" }),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(10),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_regions(&self, frame: &mut Frame, area: Rect) {
        let mut regions: Vec<Arc<Region>> = self.regions.iter().cloned().collect();
        regions.sort_by(|a, b| a.name.cmp(&b.name));

        let header = Row::new(vec![
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Code").style(theme::table_header()),
        ]);
        let rows: Vec<Row> = regions
            .iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.name.clone()),
                    Cell::from(r.code.clone().unwrap_or_default()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(rows, [Constraint::Percentage(70), Constraint::Percentage(30)])
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_roles(&self, frame: &mut Frame, area: Rect) {
        let mut roles: Vec<Arc<Role>> = self.roles.iter().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));

        let header = Row::new(vec![
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Permissions").style(theme::table_header()),
            Cell::from("Description").style(theme::table_header()),
        ]);
        let rows: Vec<Row> = roles
            .iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.name.clone()),
                    Cell::from(r.permissions.len().to_string()),
                    Cell::from(r.description.clone().unwrap_or_default()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(30),
                Constraint::Percentage(15),
                Constraint::Percentage(55),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}

fn render_input_dialog(frame: &mut Frame, area: Rect, state: &InputState, tab: OrgSubTab) {
    let noun = match tab {
        OrgSubTab::Stores => "Store",
        OrgSubTab::Regions => "Region",
        OrgSubTab::Roles => "Role",
    };
    let title = match state.purpose {
        InputPurpose::Add => format!(" New {noun} "),
        InputPurpose::Rename => format!(" Rename {noun} "),
    };

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
        .title(title)
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
