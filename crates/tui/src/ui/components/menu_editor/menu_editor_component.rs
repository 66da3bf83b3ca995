use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use selftape_types::NavItemState;

use super::{DragOutcome, MenuEditorState, Notice};
use crate::app::{Action, App};
use crate::theme;
use crate::ui::components::component::{Component, find_target_index_by_mouse_position, row_areas};

#[derive(Debug, Default)]
pub struct MenuEditorComponent;

impl MenuEditorComponent {
    pub fn new() -> Self {
        Self
    }

    fn move_selected(state: &MenuEditorState, downward: bool) -> Option<Action> {
        let from = state.selected_index;
        let to = if downward { from.checked_add(1)? } else { from.checked_sub(1)? };
        (to < state.config.len()).then_some(Action::Reorder { from, to })
    }

    fn row_line<'a>(state: &MenuEditorState, index: usize, item: &'a NavItemState, glyph: &'a str) -> Line<'a> {
        let mut style = if item.is_visible { theme::text_style() } else { theme::inert_style() };
        if state.drag.dragged_index() == Some(index) {
            style = theme::drag_style();
        } else if index == state.selected_index {
            style = theme::selected_row_style();
        }
        if state.drag.is_dragging() && state.drag.hover_index() == Some(index) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }

        let marker = if index == state.selected_index { "›" } else { " " };
        let mut spans = vec![
            Span::styled(format!("{marker} {:>2} ", item.current_order), style),
            Span::styled(format!("{glyph} "), style),
            Span::styled(item.display_title(), style),
        ];
        let mut tags = Vec::new();
        if !item.is_visible {
            tags.push("hidden".to_string());
        }
        if item.is_disabled {
            tags.push("disabled".to_string());
        }
        if let Some(rule) = item.publication_override.as_ref() {
            tags.push(format!("follows {}", rule.flag));
        }
        if item.is_suppressed()
            && let Some(flag) = item.available_when.as_deref()
        {
            tags.push(format!("unpublished: {flag}"));
        }
        if state.is_orphan(&item.id) {
            tags.push("orphan".to_string());
        }
        if !tags.is_empty() {
            spans.push(Span::styled(format!("  [{}]", tags.join(", ")), theme::text_muted()));
        }
        Line::from(spans)
    }
}

impl Component for MenuEditorComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Action> {
        let state = &mut app.editor;
        let mut actions = Vec::new();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => state.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => state.select_next(),
            KeyCode::Char('K') => actions.extend(Self::move_selected(state, false)),
            KeyCode::Char('J') => actions.extend(Self::move_selected(state, true)),
            KeyCode::Char('v') => {
                if let Some(item) = state.selected_item() {
                    actions.push(Action::SetVisibility {
                        id: item.id.clone(),
                        visible: !item.is_visible,
                    });
                }
            }
            KeyCode::Char('d') => {
                if let Some(item) = state.selected_item() {
                    actions.push(Action::SetDisabled {
                        id: item.id.clone(),
                        disabled: !item.is_disabled,
                    });
                }
            }
            KeyCode::Tab => actions.push(Action::CycleTarget),
            KeyCode::Char('p') => actions.push(Action::TogglePublished),
            KeyCode::Char('r') => actions.push(Action::Reset),
            KeyCode::Char('x') => actions.push(Action::PruneOrphans),
            KeyCode::Char('q') => actions.push(Action::Quit),
            KeyCode::Esc => state.drag.cancel(),
            _ => {}
        }
        actions
    }

    /// Left button drags rows; the right button cancels a drag in progress.
    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Action> {
        let state = &mut app.editor;
        let target = find_target_index_by_mouse_position(&state.last_area, &state.per_row_areas, mouse.column, mouse.row);
        let len = state.config.len();
        let mut actions = Vec::new();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(index) = target else {
                    return actions;
                };
                state.selected_index = index;
                if state.is_locked() {
                    state.notice = Some(Notice::error(format!("The {} menu cannot be rearranged", state.target)));
                } else {
                    state.drag.begin(index, len);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => state.drag.hover(target),
            MouseEventKind::Up(MouseButton::Left) if state.drag.is_dragging() => {
                if let DragOutcome::Reordered { from, to } = state.drag.finish(target, len) {
                    actions.push(Action::Reorder { from, to });
                }
            }
            MouseEventKind::Down(MouseButton::Right) => state.drag.cancel(),
            _ => {}
        }
        actions
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let state = &mut app.editor;
        let title = if state.is_locked() {
            format!("{} menu (read-only)", state.target)
        } else {
            format!("{} menu", state.target)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(!state.is_locked()))
            .title(Span::styled(title, theme::title_style()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [list_area, status_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        let rows = row_areas(list_area, state.config.len());
        for (index, row) in rows.iter().enumerate() {
            let item = &state.config.items[index];
            let glyph = app.icons.glyph(&item.icon_key);
            frame.render_widget(Paragraph::new(Self::row_line(state, index, item, glyph)), *row);
        }

        let published = format!("coursesPublished: {}", state.courses_published);
        let status = match state.notice.as_ref() {
            Some(notice) => Line::from(vec![
                Span::styled(notice.text.clone(), theme::notice_style(notice.is_error)),
                Span::styled(format!("  ·  {published}"), theme::text_muted()),
            ]),
            None => Line::from(Span::styled(published, theme::text_muted())),
        };
        frame.render_widget(Paragraph::new(status), status_area);

        state.last_area = list_area;
        state.per_row_areas = rows;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let hints: &[(&str, &str)] = if app.editor.is_locked() {
            &[("Tab", " role  "), ("p", " publish  "), ("q", " quit")]
        } else {
            &[
                ("↑/↓", " select  "),
                ("J/K", " move  "),
                ("v", " visible  "),
                ("d", " disabled  "),
                ("Tab", " role  "),
                ("p", " publish  "),
                ("r", " reset  "),
                ("x", " prune  "),
                ("q", " quit"),
            ]
        };
        hints
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), Style::default().fg(theme::ACCENT)),
                    Span::styled(label.to_string(), theme::text_muted()),
                ]
            })
            .collect()
    }
}
