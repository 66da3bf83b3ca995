//! Index-based reordering of a role's menu.

use selftape_types::RoleNavConfig;

/// Moves the item at `from` to `to` and renumbers every `current_order` to
/// its new position.
///
/// Out-of-range indices and `from == to` leave the config untouched and
/// return `false`.
pub fn move_item(config: &mut RoleNavConfig, from: usize, to: usize) -> bool {
    let length = config.items.len();
    if from == to || from >= length || to >= length {
        return false;
    }
    let item = config.items.remove(from);
    config.items.insert(to, item);
    config.normalize_order();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use selftape_registry::TemplateRegistry;
    use selftape_types::{NavItemState, Role};

    fn config_of(ids: &[&str]) -> RoleNavConfig {
        let registry = TemplateRegistry::embedded().unwrap();
        let template = registry.template("/sessions").unwrap();
        let items = ids
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let mut item = NavItemState::from_template(template, index as u32);
                item.id = id.to_string();
                item
            })
            .collect();
        RoleNavConfig::new(Role::Actor, registry.version, items)
    }

    fn orders(config: &RoleNavConfig) -> Vec<u32> {
        config.items.iter().map(|item| item.current_order).collect()
    }

    #[test]
    fn moves_forward_and_renumbers() {
        let mut config = config_of(&["A", "B", "C", "D"]);
        assert!(move_item(&mut config, 1, 3));
        assert_eq!(config.ids(), vec!["A", "C", "D", "B"]);
        assert_eq!(orders(&config), vec![0, 1, 2, 3]);
    }

    #[test]
    fn moves_backward() {
        let mut config = config_of(&["A", "B", "C", "D"]);
        assert!(move_item(&mut config, 3, 0));
        assert_eq!(config.ids(), vec!["D", "A", "B", "C"]);
        assert_eq!(orders(&config), vec![0, 1, 2, 3]);
    }

    #[test]
    fn invalid_indices_are_no_ops() {
        let mut config = config_of(&["A", "B"]);
        let before = config.clone();
        assert!(!move_item(&mut config, 1, 1));
        assert!(!move_item(&mut config, 2, 0));
        assert!(!move_item(&mut config, 0, 5));
        assert_eq!(config, before);
    }
}
