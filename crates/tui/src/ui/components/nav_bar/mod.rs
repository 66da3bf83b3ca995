//! Vertical sidebar preview.
//!
//! Shows the sidebar exactly as a user of the target role would see it:
//! icon, label and badge per visible entry, inert entries dimmed and the
//! active entry highlighted. Clicking an enabled entry follows its link,
//! which moves the active highlight.

mod nav_bar_component;
mod state;

pub use nav_bar_component::VerticalNavBarComponent;
pub use state::SidebarState;
