//! # Selftape navigation TUI
//!
//! The navigation consumer: turns a reconciled role configuration into the
//! sidebar a user sees, and hosts the administrator's menu editor.
//!
//! - [`sidebar`] builds sidebar entries (hidden items dropped, disabled items
//!   inert, dynamic links resolved, badges formatted, active entry marked).
//! - [`icons`] maps icon keys to glyphs with a single fallback.
//! - [`ui`] renders the editor and a live sidebar preview with ratatui and
//!   runs the terminal event loop.

mod app;
pub mod icons;
pub mod sidebar;
pub mod theme;
pub mod ui;

use anyhow::Result;

pub use app::{Action, App, EditorSession};
pub use icons::{FALLBACK_ICON, IconRegistry};
pub use sidebar::{BADGE_CAP, NavigationContext, SidebarEntry, build_sidebar, format_badge, is_active};

/// Runs the menu editor until the user quits.
///
/// # Errors
///
/// Fails when the terminal cannot be put into raw mode, drawn to, or read
/// from. Store failures never end the session; they are logged and the
/// edit is kept in memory.
pub fn run(session: EditorSession) -> Result<()> {
    ui::runtime::run_app(session)
}
