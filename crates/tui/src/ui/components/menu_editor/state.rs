use ratatui::layout::Rect;
use selftape_types::{NavItemState, Role, RoleNavConfig};

use super::drag::DragState;

/// Target roles the editor cycles through with `Tab`.
pub const TARGET_ROLES: [Role; 3] = [Role::Actor, Role::Tutor, Role::Admin];

/// One-line status shown under the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Editor state for the target role's full item list, hidden items included.
#[derive(Debug, Clone)]
pub struct MenuEditorState {
    pub target: Role,
    pub config: RoleNavConfig,
    /// Ids of items whose template no longer offers the target role.
    pub orphans: Vec<String>,
    pub selected_index: usize,
    pub drag: DragState,
    pub notice: Option<Notice>,
    pub courses_published: bool,
    /// Last rendered list area; used for mouse hit testing.
    pub last_area: Rect,
    pub per_row_areas: Vec<Rect>,
}

impl MenuEditorState {
    pub fn new(target: Role) -> Self {
        Self {
            target,
            config: RoleNavConfig::empty(target, 0),
            orphans: Vec::new(),
            selected_index: 0,
            drag: DragState::Idle,
            notice: None,
            courses_published: false,
            last_area: Rect::default(),
            per_row_areas: Vec::new(),
        }
    }

    /// Replaces the list, keeping the selection on the same item when it
    /// still exists.
    pub fn set_config(&mut self, config: RoleNavConfig, orphans: Vec<String>) {
        let selected_id = self.selected_item().map(|item| item.id.clone());
        let same_role = config.role == self.config.role;
        self.config = config;
        self.orphans = orphans;
        self.selected_index = selected_id
            .filter(|_| same_role)
            .and_then(|id| self.config.position(&id))
            .unwrap_or(self.selected_index);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.config.len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    pub fn selected_item(&self) -> Option<&NavItemState> {
        self.config.items.get(self.selected_index)
    }

    pub fn select_next(&mut self) {
        let len = self.config.len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1) % len;
        }
    }

    pub fn select_previous(&mut self) {
        let len = self.config.len();
        if len > 0 {
            self.selected_index = (self.selected_index + len - 1) % len;
        }
    }

    /// The administrator menu is shown read-only.
    pub fn is_locked(&self) -> bool {
        self.target.is_admin()
    }

    pub fn is_orphan(&self, id: &str) -> bool {
        self.orphans.iter().any(|orphan| orphan == id)
    }

    /// The role after the current target in [`TARGET_ROLES`].
    pub fn next_target(&self) -> Role {
        let index = TARGET_ROLES.iter().position(|role| *role == self.target).unwrap_or(0);
        TARGET_ROLES[(index + 1) % TARGET_ROLES.len()]
    }

    /// Switches target role, dropping any drag and the old selection.
    pub fn retarget(&mut self, target: Role) {
        self.target = target;
        self.selected_index = 0;
        self.drag.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selftape_engine::reconcile;
    use selftape_registry::TemplateRegistry;
    use selftape_types::PublicationFlags;

    fn tutor_config() -> RoleNavConfig {
        reconcile(Role::Tutor, None, &TemplateRegistry::embedded().unwrap(), &PublicationFlags::new())
    }

    #[test]
    fn selection_follows_item_across_reloads() {
        let mut state = MenuEditorState::new(Role::Tutor);
        let mut config = tutor_config();
        state.set_config(config.clone(), Vec::new());
        state.selected_index = 1;
        let selected = state.selected_item().unwrap().id.clone();

        let item = config.items.remove(1);
        config.items.push(item);
        state.set_config(config, Vec::new());
        assert_eq!(state.selected_item().unwrap().id, selected);
    }

    #[test]
    fn selection_wraps_and_clamps() {
        let mut state = MenuEditorState::new(Role::Tutor);
        state.set_config(tutor_config(), Vec::new());
        state.select_previous();
        assert_eq!(state.selected_index, state.config.len() - 1);
        state.select_next();
        assert_eq!(state.selected_index, 0);

        state.selected_index = 40;
        state.set_config(RoleNavConfig::empty(Role::Tutor, 1), Vec::new());
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn targets_cycle_through_roles_with_menus() {
        let mut state = MenuEditorState::new(Role::Actor);
        let mut seen = Vec::new();
        for _ in 0..3 {
            let next = state.next_target();
            state.retarget(next);
            seen.push(next);
        }
        assert_eq!(seen, vec![Role::Tutor, Role::Admin, Role::Actor]);
        assert!(!state.is_locked());
        state.retarget(Role::Admin);
        assert!(state.is_locked());
    }
}
