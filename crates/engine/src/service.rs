//! Navigation service: the one place that reads, reconciles and writes back
//! role configurations, and the gatekeeper for admin edits.
//!
//! Concurrent edits from two sessions follow last-write-wins; nothing here
//! detects or merges conflicting writes.

use std::sync::Arc;

use selftape_registry::TemplateRegistry;
use selftape_types::{NavItemState, Role, RoleNavConfig};
use selftape_util::KeyValueStore;
use tracing::{debug, info, warn};

use crate::config_store::NavConfigStore;
use crate::error::EditError;
use crate::oracle::PublicationOracle;
use crate::reconcile::reconcile;
use crate::reorder::move_item;

/// Result of an accepted edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing changed and nothing was written.
    Unchanged(RoleNavConfig),
    /// The edit was applied and persisted.
    Updated(RoleNavConfig),
}

impl EditOutcome {
    pub fn config(&self) -> &RoleNavConfig {
        match self {
            Self::Unchanged(config) | Self::Updated(config) => config,
        }
    }

    pub fn into_config(self) -> RoleNavConfig {
        match self {
            Self::Unchanged(config) | Self::Updated(config) => config,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

pub struct NavigationService {
    registry: Arc<TemplateRegistry>,
    configs: NavConfigStore,
    oracle: Arc<dyn PublicationOracle>,
}

impl NavigationService {
    pub fn new(registry: Arc<TemplateRegistry>, store: Arc<dyn KeyValueStore>, oracle: Arc<dyn PublicationOracle>) -> Self {
        Self {
            registry,
            configs: NavConfigStore::new(store),
            oracle,
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn configs(&self) -> &NavConfigStore {
        &self.configs
    }

    /// The reconciled list for `role`.
    ///
    /// The first read of a role persists its synthesized list; later reads
    /// write back only when reconciliation changed something. Never fails:
    /// store problems are logged and the in-memory result is returned.
    pub fn role_config(&self, role: Role) -> RoleNavConfig {
        if !role.has_navigation() {
            return reconcile(role, None, &self.registry, self.oracle.as_ref());
        }
        let persisted = self.configs.load(role);
        let mut config = reconcile(role, persisted.as_ref(), &self.registry, self.oracle.as_ref());
        config.normalize_order();
        if persisted.as_ref() != Some(&config) {
            match self.configs.save(&config) {
                Ok(()) => debug!(role = %role, first_run = persisted.is_none(), "wrote reconciled navigation config"),
                Err(error) => warn!(role = %role, error = %error, "Failed to persist reconciled navigation config"),
            }
        }
        config
    }

    /// Ids in the role's persisted list whose template no longer offers the
    /// role (or no longer exists).
    pub fn orphans(&self, config: &RoleNavConfig) -> Vec<String> {
        config
            .items
            .iter()
            .filter(|item| self.is_orphan(config.role, &item.id))
            .map(|item| item.id.clone())
            .collect()
    }

    fn is_orphan(&self, role: Role, id: &str) -> bool {
        self.registry.template(id).is_none_or(|template| !template.is_eligible(role))
    }

    pub fn reorder(&self, editor: Role, target: Role, from: usize, to: usize) -> Result<EditOutcome, EditError> {
        authorize(editor, target)?;
        let mut config = self.role_config(target);
        if !move_item(&mut config, from, to) {
            debug!(role = %target, from, to, "ignoring reorder with invalid indices");
            return Ok(EditOutcome::Unchanged(config));
        }
        Ok(self.commit(config, "reorder"))
    }

    pub fn set_visibility(&self, editor: Role, target: Role, id: &str, visible: bool) -> Result<EditOutcome, EditError> {
        self.toggle(editor, target, id, "visibility", |item| {
            let changed = item.is_visible != visible;
            item.is_visible = visible;
            changed
        })
    }

    pub fn set_disabled(&self, editor: Role, target: Role, id: &str, disabled: bool) -> Result<EditOutcome, EditError> {
        self.toggle(editor, target, id, "disabled", |item| {
            let changed = item.is_disabled != disabled;
            item.is_disabled = disabled;
            changed
        })
    }

    fn toggle(
        &self,
        editor: Role,
        target: Role,
        id: &str,
        action: &str,
        apply: impl FnOnce(&mut NavItemState) -> bool,
    ) -> Result<EditOutcome, EditError> {
        authorize(editor, target)?;
        let mut config = self.role_config(target);
        let Some(item) = config.item_mut(id) else {
            return Err(EditError::UnknownItem {
                role: target,
                id: id.to_string(),
            });
        };
        let controlling_flag = match item.publication_override.as_ref() {
            Some(rule) => Some(rule.flag.clone()),
            None if item.is_suppressed() => item.available_when.clone(),
            None => None,
        };
        if let Some(flag) = controlling_flag {
            return Err(EditError::PublicationControlled { id: id.to_string(), flag });
        }
        if !apply(item) {
            return Ok(EditOutcome::Unchanged(config));
        }
        Ok(self.commit(config, action))
    }

    /// Removes orphaned items from the role's persisted list.
    pub fn prune_orphans(&self, editor: Role, target: Role) -> Result<EditOutcome, EditError> {
        authorize(editor, target)?;
        let mut config = self.role_config(target);
        let before = config.len();
        config.items.retain(|item| !self.is_orphan(target, &item.id));
        if config.len() == before {
            return Ok(EditOutcome::Unchanged(config));
        }
        config.normalize_order();
        info!(role = %target, pruned = before - config.len(), "pruned orphaned navigation items");
        Ok(self.commit(config, "prune"))
    }

    pub fn reset(&self, editor: Role, target: Role) -> Result<RoleNavConfig, EditError> {
        authorize(editor, target)?;
        Ok(self.configs.reset(target, &self.registry, self.oracle.as_ref()))
    }

    fn commit(&self, config: RoleNavConfig, action: &str) -> EditOutcome {
        match self.configs.save(&config) {
            Ok(()) => info!(role = %config.role, action, "persisted navigation edit"),
            Err(error) => warn!(role = %config.role, action, error = %error, "Failed to persist navigation edit; keeping it in memory"),
        }
        EditOutcome::Updated(config)
    }
}

/// Admins edit every menu except their own; nobody else edits menus.
pub fn authorize(editor: Role, target: Role) -> Result<(), EditError> {
    if !editor.is_admin() {
        return Err(EditError::NotAuthorized { editor });
    }
    if !target.has_navigation() {
        return Err(EditError::NoNavigation { role: target });
    }
    if target.is_admin() {
        return Err(EditError::LockedMenu { role: target });
    }
    Ok(())
}
