//! Runtime: terminal lifecycle and the event loop.
//!
//! Single-threaded. Each pass drains publication changes, waits up to one
//! tick for terminal input, applies the resulting actions and redraws when
//! something changed. Logging must not target stdout or stderr while the
//! alternate screen is active.

use std::io::Stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::app::{App, EditorSession};
use crate::ui::main_component::MainView;

const TICK: Duration = Duration::from_millis(250);

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();
        main_view.render(frame, area, app);
    })?;
    Ok(())
}

fn is_interrupt(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let mut main_view = MainView::new();
    render(terminal, app, &mut main_view)?;

    while !app.should_quit {
        let mut needs_render = app.poll_flag_changes();
        if event::poll(TICK).context("failed to poll terminal input")? {
            let input = event::read().context("failed to read terminal input")?;
            if is_interrupt(&input) {
                break;
            }
            for action in main_view.handle_input_event(app, input) {
                app.apply(action);
            }
            needs_render = true;
        }
        if needs_render {
            render(terminal, app, &mut main_view)?;
        }
    }
    Ok(())
}

/// Sets up the terminal, runs the editor until the user quits and restores
/// the terminal even when the loop fails.
pub fn run_app(session: EditorSession) -> Result<()> {
    let mut app = App::new(session);
    let mut terminal = setup_terminal()?;
    let outcome = event_loop(&mut terminal, &mut app);
    if let Err(error) = cleanup_terminal(&mut terminal) {
        tracing::warn!("Failed to restore terminal: {}", error);
    }
    outcome
}
