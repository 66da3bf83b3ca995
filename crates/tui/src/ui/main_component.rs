use crossterm::event::{Event, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use super::components::menu_editor::MenuEditorComponent;
use super::components::nav_bar::VerticalNavBarComponent;
use super::components::Component;
use crate::app::{Action, App};

/// Top-level layout: editor on the left, sidebar preview on the right, key
/// hints along the bottom.
#[derive(Debug, Default)]
pub struct MainView {
    pub editor_view: MenuEditorComponent,
    pub nav_bar_view: VerticalNavBarComponent,
}

impl MainView {
    pub fn new() -> Self {
        Self {
            editor_view: MenuEditorComponent::new(),
            nav_bar_view: VerticalNavBarComponent::new(),
        }
    }

    /// Keys go to the editor; mouse events go to whichever pane was hit.
    pub fn handle_input_event(&mut self, app: &mut App, event: Event) -> Vec<Action> {
        match event {
            Event::Key(key) => self.editor_view.handle_key_events(app, key),
            Event::Mouse(mouse) => self.handle_mouse_events(app, mouse),
            Event::Resize(..) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Action> {
        let mut actions = self.editor_view.handle_mouse_events(app, mouse);
        if !app.editor.drag.is_dragging() {
            actions.extend(self.nav_bar_view.handle_mouse_events(app, mouse));
        }
        actions
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let [body, footer] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        let [editor_area, preview_area] = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body);

        self.editor_view.render(frame, editor_area, app);
        self.nav_bar_view.render(frame, preview_area, app);
        let hints = Line::from(self.editor_view.get_hint_spans(app));
        frame.render_widget(Paragraph::new(hints), footer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::app_for;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};
    use selftape_types::Role;

    #[test]
    fn full_screen_shows_editor_preview_and_hints() {
        let mut app = app_for(Role::Admin, Role::Tutor);
        let mut view = MainView::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                view.render(frame, area, &mut app);
            })
            .unwrap();
        let screen: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("tutor menu"));
        assert!(screen.contains("Preview: tutor"));
        assert!(screen.contains("Review Queue"));
        assert!(screen.contains("prune"));
    }

    #[test]
    fn key_events_reach_the_editor() {
        let mut app = app_for(Role::Admin, Role::Actor);
        let mut view = MainView::new();
        let actions = view.handle_input_event(&mut app, Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert_eq!(actions, vec![Action::Quit]);
        assert!(view.handle_input_event(&mut app, Event::Resize(80, 24)).is_empty());
    }
}
