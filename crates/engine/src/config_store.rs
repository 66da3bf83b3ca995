//! Per-role configuration store.
//!
//! One serialized [`RoleNavConfig`] per role lives under
//! `selftape.nav.<role>`. Loading never writes; anything unreadable is
//! reported as absent so the engine falls back to fresh synthesis.

use std::sync::Arc;

use selftape_registry::TemplateRegistry;
use selftape_types::{Role, RoleNavConfig};
use selftape_util::{KeyValueStore, StoreError};
use tracing::{info, warn};

use crate::oracle::PublicationOracle;
use crate::reconcile::reconcile;

pub const NAV_KEY_PREFIX: &str = "selftape.nav.";

pub fn storage_key(role: Role) -> String {
    format!("{NAV_KEY_PREFIX}{role}")
}

#[derive(Clone)]
pub struct NavConfigStore {
    store: Arc<dyn KeyValueStore>,
}

impl NavConfigStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self, role: Role) -> Option<RoleNavConfig> {
        let key = storage_key(role);
        let raw = match self.store.get(&key) {
            Ok(raw) => raw?,
            Err(error) => {
                warn!(role = %role, error = %error, "Failed to read navigation config; using defaults");
                return None;
            }
        };
        match serde_json::from_str::<RoleNavConfig>(&raw) {
            Ok(config) if config.role == role => Some(config),
            Ok(config) => {
                warn!(role = %role, stored_role = %config.role, "Navigation config stored under the wrong role; ignoring it");
                None
            }
            Err(error) => {
                warn!(role = %role, error = %error, "Corrupt navigation config; regenerating from templates");
                None
            }
        }
    }

    /// Fully replaces the persisted value for the config's role.
    pub fn save(&self, config: &RoleNavConfig) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(config)?;
        self.store.set(&storage_key(config.role), &serialized)
    }

    pub fn discard(&self, role: Role) -> Result<(), StoreError> {
        self.store.remove(&storage_key(role))
    }

    /// Discards the role's persisted state and regenerates it from the
    /// registry and the current flags. Store failures are logged; the
    /// regenerated list is returned either way.
    pub fn reset(&self, role: Role, registry: &TemplateRegistry, oracle: &dyn PublicationOracle) -> RoleNavConfig {
        if let Err(error) = self.discard(role) {
            warn!(role = %role, error = %error, "Failed to discard navigation config");
        }
        let mut config = reconcile(role, None, registry, oracle);
        config.normalize_order();
        if role.has_navigation() {
            match self.save(&config) {
                Ok(()) => info!(role = %role, items = config.len(), "navigation config reset"),
                Err(error) => warn!(role = %role, error = %error, "Failed to persist reset navigation config"),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selftape_types::PublicationFlags;
    use selftape_util::InMemoryStore;

    fn fixture() -> (Arc<InMemoryStore>, NavConfigStore, TemplateRegistry) {
        let raw = Arc::new(InMemoryStore::new());
        let store = NavConfigStore::new(raw.clone());
        (raw, store, TemplateRegistry::embedded().unwrap())
    }

    #[test]
    fn missing_config_loads_as_none() {
        let (_, store, _) = fixture();
        assert!(store.load(Role::Actor).is_none());
    }

    #[test]
    fn save_then_load_returns_same_config() {
        let (_, store, registry) = fixture();
        let config = reconcile(Role::Tutor, None, &registry, &PublicationFlags::new());
        store.save(&config).unwrap();
        assert_eq!(store.load(Role::Tutor), Some(config));
    }

    #[test]
    fn corrupt_record_loads_as_none() {
        let (raw, store, _) = fixture();
        raw.set(&storage_key(Role::Actor), "{\"role\":\"actor\",\"items\":[{\"id\":3}]}").unwrap();
        assert!(store.load(Role::Actor).is_none());
    }

    #[test]
    fn record_for_another_role_loads_as_none() {
        let (_, store, registry) = fixture();
        let tutor = reconcile(Role::Tutor, None, &registry, &PublicationFlags::new());
        let raw = serde_json::to_string(&tutor).unwrap();
        store.store.set(&storage_key(Role::Actor), &raw).unwrap();
        assert!(store.load(Role::Actor).is_none());
    }

    #[test]
    fn reset_replaces_customizations() {
        let (raw, store, registry) = fixture();
        let flags = PublicationFlags::new();
        let mut config = reconcile(Role::Actor, None, &registry, &flags);
        config.items.reverse();
        config.normalize_order();
        store.save(&config).unwrap();

        let reset = store.reset(Role::Actor, &registry, &flags);
        assert_eq!(reset.items.first().map(|item| item.id.as_str()), Some("/actor/dashboard"));
        assert_eq!(store.load(Role::Actor), Some(reset));
        assert!(raw.keys().contains(&storage_key(Role::Actor)));
    }

    #[test]
    fn keys_use_stable_prefix() {
        assert_eq!(storage_key(Role::Admin), "selftape.nav.admin");
    }
}
