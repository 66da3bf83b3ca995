//! Navigation templates, persisted item states and per-role configurations.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Role;

/// Forced visibility/disabled state for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPresentation {
    pub visible: bool,
    pub disabled: bool,
}

impl ItemPresentation {
    pub const ENABLED: Self = Self {
        visible: true,
        disabled: false,
    };

    /// Presentation of an item whose feature is unpublished.
    pub const SUPPRESSED: Self = Self {
        visible: false,
        disabled: true,
    };
}

/// Item-level rule tying an entry's presentation to a publication flag.
///
/// Items carrying a rule never trust persisted `isVisible`/`isDisabled`
/// values; both are recomputed from the flag on every reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationOverride {
    /// Name of the flag the rule reads.
    pub flag: String,
    /// Presentation forced while the flag is `true`.
    pub when_true: ItemPresentation,
    /// Presentation forced while the flag is `false`.
    pub when_false: ItemPresentation,
}

impl PublicationOverride {
    pub fn presentation(&self, flag_value: bool) -> ItemPresentation {
        if flag_value { self.when_true } else { self.when_false }
    }
}

/// Immutable blueprint for one navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItemTemplate {
    /// Stable identifier; always equal to the canonical `path`.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Symbolic icon reference resolved by the renderer.
    pub icon_key: String,
    /// Canonical route. May contain `:placeholder` segments.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_order: Option<u32>,
    pub eligible_roles: BTreeSet<Role>,
    #[serde(default)]
    pub is_dynamic: bool,
    #[serde(default)]
    pub exact_match: bool,
    /// Counter feed used to badge the entry (for example `messages`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_source: Option<String>,
    /// Publication flag that must be `true` for the template to be offered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_when: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_override: Option<PublicationOverride>,
    /// Sentinels used for placeholders when no contextual value exists.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub path_defaults: IndexMap<String, String>,
}

impl NavItemTemplate {
    pub fn is_eligible(&self, role: Role) -> bool {
        self.eligible_roles.contains(&role)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Persisted, mutable state of one navigation entry for one role.
///
/// Template fields are copied in at reconciliation time so consumers never
/// need the template to render. Only `current_order`, `is_visible` and
/// `is_disabled` are user-controlled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItemState {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub icon_key: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_order: Option<u32>,
    #[serde(default)]
    pub eligible_roles: BTreeSet<Role>,
    #[serde(default)]
    pub is_dynamic: bool,
    #[serde(default)]
    pub exact_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_when: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_override: Option<PublicationOverride>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub path_defaults: IndexMap<String, String>,
    pub current_order: u32,
    pub is_visible: bool,
    pub is_disabled: bool,
    /// User presentation set aside while the `availableWhen` gate is closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub held_presentation: Option<ItemPresentation>,
}

impl NavItemState {
    /// Synthesizes a fresh, visible and enabled state for a template.
    pub fn from_template(template: &NavItemTemplate, current_order: u32) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            title: template.title.clone(),
            icon_key: template.icon_key.clone(),
            path: template.path.clone(),
            default_order: template.default_order,
            eligible_roles: template.eligible_roles.clone(),
            is_dynamic: template.is_dynamic,
            exact_match: template.exact_match,
            notification_source: template.notification_source.clone(),
            available_when: template.available_when.clone(),
            publication_override: template.publication_override.clone(),
            path_defaults: template.path_defaults.clone(),
            current_order,
            is_visible: true,
            is_disabled: false,
            held_presentation: None,
        }
    }

    /// Overwrites every template-owned field, leaving the user-controlled
    /// `current_order`, `is_visible` and `is_disabled` untouched.
    pub fn refresh_from_template(&mut self, template: &NavItemTemplate) {
        self.id.clone_from(&template.id);
        self.name.clone_from(&template.name);
        self.title.clone_from(&template.title);
        self.icon_key.clone_from(&template.icon_key);
        self.path.clone_from(&template.path);
        self.default_order = template.default_order;
        self.eligible_roles.clone_from(&template.eligible_roles);
        self.is_dynamic = template.is_dynamic;
        self.exact_match = template.exact_match;
        self.notification_source.clone_from(&template.notification_source);
        self.available_when.clone_from(&template.available_when);
        self.publication_override.clone_from(&template.publication_override);
        self.path_defaults.clone_from(&template.path_defaults);
    }

    pub fn apply_presentation(&mut self, presentation: ItemPresentation) {
        self.is_visible = presentation.visible;
        self.is_disabled = presentation.disabled;
    }

    pub fn presentation(&self) -> ItemPresentation {
        ItemPresentation {
            visible: self.is_visible,
            disabled: self.is_disabled,
        }
    }

    /// Hides and disables the item, keeping the user's presentation so
    /// [`NavItemState::release`] can restore it. Repeated calls keep the first
    /// held value.
    pub fn suppress(&mut self) {
        if self.held_presentation.is_none() {
            self.held_presentation = Some(self.presentation());
        }
        self.apply_presentation(ItemPresentation::SUPPRESSED);
    }

    /// Restores the presentation held by [`NavItemState::suppress`], if any.
    pub fn release(&mut self) {
        if let Some(presentation) = self.held_presentation.take() {
            self.apply_presentation(presentation);
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.held_presentation.is_some()
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Whether the entry's presentation is driven by a publication flag.
    pub fn is_publication_controlled(&self) -> bool {
        self.publication_override.is_some()
    }
}

/// The ordered sidebar of one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleNavConfig {
    pub role: Role,
    /// Catalog version this list was last reconciled against.
    #[serde(default)]
    pub catalog_version: u32,
    pub items: Vec<NavItemState>,
}

impl RoleNavConfig {
    pub fn new(role: Role, catalog_version: u32, items: Vec<NavItemState>) -> Self {
        Self {
            role,
            catalog_version,
            items,
        }
    }

    pub fn empty(role: Role, catalog_version: u32) -> Self {
        Self::new(role, catalog_version, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: &str) -> Option<&NavItemState> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut NavItemState> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &NavItemState> {
        self.items.iter().filter(|item| item.is_visible)
    }

    /// Rewrites every `current_order` to its position index.
    pub fn normalize_order(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.current_order = index as u32;
        }
    }

    pub fn is_densely_ordered(&self) -> bool {
        self.items.iter().enumerate().all(|(index, item)| item.current_order == index as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> NavItemTemplate {
        NavItemTemplate {
            id: "/messages".into(),
            name: "Messages".into(),
            title: None,
            icon_key: "mail".into(),
            path: "/messages".into(),
            default_order: Some(4),
            eligible_roles: [Role::Actor, Role::Tutor].into_iter().collect(),
            is_dynamic: false,
            exact_match: false,
            notification_source: Some("messages".into()),
            available_when: None,
            publication_override: None,
            path_defaults: IndexMap::new(),
        }
    }

    #[test]
    fn refresh_keeps_user_fields() {
        let mut state = NavItemState::from_template(&template(), 2);
        state.is_visible = false;
        state.is_disabled = true;
        state.current_order = 9;

        let mut renamed = template();
        renamed.name = "Inbox".into();
        renamed.icon_key = "inbox".into();
        state.refresh_from_template(&renamed);

        assert_eq!(state.name, "Inbox");
        assert_eq!(state.icon_key, "inbox");
        assert_eq!(state.current_order, 9);
        assert!(!state.is_visible);
        assert!(state.is_disabled);
    }

    #[test]
    fn state_serializes_with_contract_field_names() {
        let state = NavItemState::from_template(&template(), 0);
        let value = serde_json::to_value(&state).unwrap();
        for field in [
            "id",
            "name",
            "iconKey",
            "path",
            "defaultOrder",
            "eligibleRoles",
            "isDynamic",
            "exactMatch",
            "notificationSource",
            "currentOrder",
            "isVisible",
            "isDisabled",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(value["eligibleRoles"], serde_json::json!(["actor", "tutor"]));
    }

    #[test]
    fn suppression_holds_the_user_presentation() {
        let mut state = NavItemState::from_template(&template(), 0);
        state.is_visible = false;
        state.suppress();
        state.suppress();
        assert!(state.is_suppressed());
        assert_eq!(state.presentation(), ItemPresentation::SUPPRESSED);

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["heldPresentation"], serde_json::json!({"visible": false, "disabled": false}));

        state.release();
        assert!(!state.is_suppressed());
        assert!(!state.is_visible);
        assert!(!state.is_disabled);
        assert!(serde_json::to_value(&state).unwrap().get("heldPresentation").is_none());
    }

    #[test]
    fn normalize_order_makes_positions_dense() {
        let mut first = NavItemState::from_template(&template(), 7);
        first.id = "/a".into();
        let mut second = NavItemState::from_template(&template(), 7);
        second.id = "/b".into();
        let mut config = RoleNavConfig::new(Role::Actor, 1, vec![first, second]);
        assert!(!config.is_densely_ordered());
        config.normalize_order();
        assert!(config.is_densely_ordered());
        assert_eq!(config.ids(), vec!["/a", "/b"]);
    }
}
