//! Colors and styles for the sidebar preview and menu editor.
//!
//! Dark panel background with a single blue accent; hidden and inert rows
//! are dimmed rather than removed so editors can still see them.

use ratatui::style::{Color, Modifier, Style};

/// Accent for focus, selection and active sidebar entries.
pub const ACCENT: Color = Color::Rgb(8, 171, 237);

pub const FG: Color = Color::Rgb(224, 224, 230);

/// Secondary text: hints, disabled entries, hidden rows in the editor.
pub const FG_MUTED: Color = Color::Rgb(120, 120, 128);

pub const BORDER: Color = Color::Rgb(72, 72, 80);

pub const BG_PANEL: Color = Color::Rgb(18, 18, 24);

pub const BG_SELECT: Color = Color::Rgb(18, 28, 38);

/// Badges and error notices.
pub const WARN: Color = Color::Rgb(220, 96, 110);

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(BORDER)
    }
}

pub fn title_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::BOLD)
}

pub fn text_style() -> Style {
    Style::default().fg(FG)
}

pub fn text_muted() -> Style {
    Style::default().fg(FG_MUTED)
}

/// Inert sidebar entries and hidden editor rows.
pub fn inert_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::DIM)
}

/// The active sidebar entry.
pub fn active_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn selected_row_style() -> Style {
    Style::default().fg(FG).bg(BG_SELECT).add_modifier(Modifier::BOLD)
}

/// The row being dragged in the editor.
pub fn drag_style() -> Style {
    Style::default().fg(ACCENT).bg(BG_SELECT).add_modifier(Modifier::ITALIC)
}

pub fn badge_style() -> Style {
    Style::default().fg(BG_PANEL).bg(WARN).add_modifier(Modifier::BOLD)
}

pub fn notice_style(is_error: bool) -> Style {
    if is_error { Style::default().fg(WARN) } else { text_muted() }
}
