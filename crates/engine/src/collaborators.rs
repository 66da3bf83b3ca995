//! Interfaces to collaborators outside the navigation core: who is signed in,
//! and how many unread notifications feed each badge.

use std::sync::Arc;

use indexmap::IndexMap;
use selftape_types::Role;
use selftape_util::{KeyValueStore, StoreError};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

pub trait IdentityProvider {
    /// The signed-in user, if any.
    fn current(&self) -> Option<Identity>;
}

/// Fixed identity, used by the CLI where the user is given on the command line.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Identity);

impl StaticIdentity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self(Identity {
            user_id: user_id.into(),
            role,
        })
    }
}

impl IdentityProvider for StaticIdentity {
    fn current(&self) -> Option<Identity> {
        Some(self.0.clone())
    }
}

pub trait NotificationCounter {
    fn unread_count(&self, user_id: &str, source: &str) -> u32;
}

/// Counter that never reports anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNotifications;

impl NotificationCounter for NoNotifications {
    fn unread_count(&self, _user_id: &str, _source: &str) -> u32 {
        0
    }
}

/// Counts kept in the key-value store as one `{source: count}` object per
/// user under `selftape.unread.<user_id>`.
pub struct StoredNotificationCounter {
    store: Arc<dyn KeyValueStore>,
}

impl StoredNotificationCounter {
    pub const KEY_PREFIX: &'static str = "selftape.unread.";

    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(user_id: &str) -> String {
        format!("{}{user_id}", Self::KEY_PREFIX)
    }

    fn counts(&self, user_id: &str) -> IndexMap<String, u32> {
        match self.store.get(&Self::key(user_id)) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                warn!(user_id, error = %error, "Corrupt unread counter record; ignoring it");
                IndexMap::new()
            }),
            Ok(None) => IndexMap::new(),
            Err(error) => {
                warn!(user_id, error = %error, "Failed to read unread counters");
                IndexMap::new()
            }
        }
    }

    pub fn set_count(&self, user_id: &str, source: &str, count: u32) -> Result<(), StoreError> {
        let mut counts = self.counts(user_id);
        counts.insert(source.to_string(), count);
        self.store.set(&Self::key(user_id), &serde_json::to_string(&counts)?)
    }
}

impl NotificationCounter for StoredNotificationCounter {
    fn unread_count(&self, user_id: &str, source: &str) -> u32 {
        self.counts(user_id).get(source).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selftape_util::InMemoryStore;

    #[test]
    fn stored_counts_are_scoped_per_user() {
        let counter = StoredNotificationCounter::new(Arc::new(InMemoryStore::new()));
        counter.set_count("u-1", "messages", 4).unwrap();
        counter.set_count("u-1", "feedback", 12).unwrap();
        assert_eq!(counter.unread_count("u-1", "messages"), 4);
        assert_eq!(counter.unread_count("u-1", "feedback"), 12);
        assert_eq!(counter.unread_count("u-2", "messages"), 0);
    }

    #[test]
    fn corrupt_counts_read_as_zero() {
        let store = Arc::new(InMemoryStore::new());
        store.set("selftape.unread.u-1", "nope").unwrap();
        let counter = StoredNotificationCounter::new(store);
        assert_eq!(counter.unread_count("u-1", "messages"), 0);
    }

    #[test]
    fn static_identity_reports_itself() {
        let identity = StaticIdentity::new("u-9", Role::Tutor);
        assert_eq!(identity.current().map(|current| current.role), Some(Role::Tutor));
    }
}
