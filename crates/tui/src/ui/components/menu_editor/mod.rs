//! Menu editor: the target role's full list with reorder and toggle controls.
//!
//! Keys: `↑/↓` select, `J/K` move, `v` visibility, `d` disabled, `Tab`
//! switch role, `p` publish courses, `r` reset, `x` prune orphans, `q` quit.
//! Rows can also be dragged with the mouse. The administrator menu is shown
//! read-only.

mod drag;
mod menu_editor_component;
mod state;

pub use drag::{DragOutcome, DragState};
pub use menu_editor_component::MenuEditorComponent;
pub use state::{MenuEditorState, Notice, TARGET_ROLES};
