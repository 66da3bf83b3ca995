//! Component trait shared by the editor and the sidebar preview.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::text::Span;

use crate::app::{Action, App};

/// A UI element that reacts to input by returning [`Action`]s and renders
/// itself from state held on [`App`].
pub(crate) trait Component {
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Action> {
        Vec::new()
    }

    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Action> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App);

    /// Key hints for the footer.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        Vec::new()
    }
}

/// Index of the row under `(x, y)`, if the point is inside `container`.
pub(crate) fn find_target_index_by_mouse_position(container: &Rect, rows: &[Rect], x: u16, y: u16) -> Option<usize> {
    let position = Position::new(x, y);
    if !container.contains(position) {
        return None;
    }
    rows.iter().position(|row| row.contains(position))
}

/// Single-line row areas stacked from the top of `inner`, clipped to its height.
pub(crate) fn row_areas(inner: Rect, count: usize) -> Vec<Rect> {
    (0..count.min(inner.height as usize))
        .map(|index| Rect::new(inner.x, inner.y + index as u16, inner.width, 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_testing_uses_row_areas() {
        let container = Rect::new(0, 0, 20, 6);
        let rows = row_areas(Rect::new(1, 1, 18, 4), 10);
        assert_eq!(rows.len(), 4);
        assert_eq!(find_target_index_by_mouse_position(&container, &rows, 5, 3), Some(2));
        assert_eq!(find_target_index_by_mouse_position(&container, &rows, 5, 5), None);
        assert_eq!(find_target_index_by_mouse_position(&container, &rows, 30, 3), None);
    }
}
