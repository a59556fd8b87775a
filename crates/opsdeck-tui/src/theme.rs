//! Harbor palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const HARBOR_BLUE: Color = Color::Rgb(95, 175, 255); // #5fafff
pub const SEAFOAM: Color = Color::Rgb(132, 228, 196); // #84e4c4
pub const AMBER: Color = Color::Rgb(255, 191, 105); // #ffbf69
pub const SUCCESS_GREEN: Color = Color::Rgb(110, 231, 130); // #6ee782
pub const ERROR_RED: Color = Color::Rgb(255, 107, 107); // #ff6b6b

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(197, 200, 210); // #c5c8d2
pub const BORDER_GRAY: Color = Color::Rgb(92, 103, 132); // #5c6784
pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 42, 56); // #262a38
pub const BG_DARK: Color = Color::Rgb(26, 29, 40); // #1a1d28

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default()
        .fg(HARBOR_BLUE)
        .add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(SEAFOAM)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(HARBOR_BLUE)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(SEAFOAM)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// A row being carried by a drag gesture.
pub fn row_dragged() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD | Modifier::ITALIC)
}

/// A pending (unsaved) row awaiting its create request.
pub fn row_pending() -> Style {
    Style::default()
        .fg(BORDER_GRAY)
        .add_modifier(Modifier::ITALIC)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default().fg(SEAFOAM).add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default()
        .fg(HARBOR_BLUE)
        .add_modifier(Modifier::BOLD)
}
