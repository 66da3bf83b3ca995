use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{Action, App};
use crate::sidebar::SidebarEntry;
use crate::theme;
use crate::ui::components::component::{Component, find_target_index_by_mouse_position, row_areas};

#[derive(Debug)]
pub struct VerticalNavBarComponent {
    /// Title of the surrounding block. When `None`, no title is shown.
    pub title: Option<String>,
}

impl Default for VerticalNavBarComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl VerticalNavBarComponent {
    pub fn new() -> Self {
        Self {
            title: Some("Preview".to_string()),
        }
    }

    fn entry_style(entry: &SidebarEntry) -> ratatui::style::Style {
        if !entry.enabled {
            theme::inert_style()
        } else if entry.active {
            theme::active_style()
        } else {
            theme::text_style()
        }
    }

    fn render_entry(frame: &mut Frame, area: Rect, entry: &SidebarEntry) {
        let badge_width = entry.badge.as_ref().map_or(0, |badge| badge.chars().count() as u16 + 2);
        let [label_area, badge_area] = Layout::horizontal([Constraint::Min(0), Constraint::Length(badge_width)]).areas(area);

        let style = Self::entry_style(entry);
        let marker = if entry.active { "▌" } else { " " };
        let label = Line::from(vec![
            Span::styled(marker, theme::active_style()),
            Span::styled(format!("{} ", entry.icon), style),
            Span::styled(entry.label.clone(), style),
        ]);
        frame.render_widget(Paragraph::new(label), label_area);

        if let Some(badge) = entry.badge.as_ref() {
            frame.render_widget(Paragraph::new(Span::styled(format!(" {badge} "), theme::badge_style())), badge_area);
        }
    }
}

impl Component for VerticalNavBarComponent {
    /// Clicking an enabled entry navigates to it; inert entries ignore clicks.
    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Action> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let state = &app.sidebar;
        find_target_index_by_mouse_position(&state.last_area, &state.per_item_areas, mouse.column, mouse.row)
            .and_then(|index| state.entries.get(index))
            .and_then(|entry| entry.target())
            .map(|href| vec![Action::Navigate(href.to_string())])
            .unwrap_or_default()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let mut block = Block::default().borders(Borders::ALL).border_style(theme::border_style(false));
        if let Some(title) = self.title.as_deref() {
            block = block.title(Span::styled(format!("{title}: {}", app.editor.target), theme::title_style()));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let state = &mut app.sidebar;
        if state.entries.is_empty() {
            frame.render_widget(Paragraph::new(Span::styled("No navigation", theme::text_muted())), inner);
        }
        let rows = row_areas(inner, state.entries.len());
        for (entry, row) in state.entries.iter().zip(rows.iter()) {
            Self::render_entry(frame, *row, entry);
        }
        state.last_area = inner;
        state.per_item_areas = rows;
    }
}
