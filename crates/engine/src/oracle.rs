//! Publication-state oracle.
//!
//! Flags can change at any time (an admin publishes the course catalog from
//! another session), so oracles are queried fresh on every reconciliation
//! pass. A pass takes one [`snapshot`] up front so every item in the pass
//! sees the same values.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};

use selftape_types::{FlagChange, PublicationFlags};
use selftape_util::{KeyValueStore, StoreError};
use tracing::{info, warn};

/// Storage key holding the serialized publication flags.
pub const PUBLICATION_KEY: &str = "selftape.publication";

pub trait PublicationOracle: Send + Sync {
    fn flag(&self, name: &str) -> bool;
}

impl PublicationOracle for PublicationFlags {
    fn flag(&self, name: &str) -> bool {
        self.get(name)
    }
}

/// Reads each named flag once.
pub fn snapshot<'a>(oracle: &dyn PublicationOracle, names: impl IntoIterator<Item = &'a str>) -> PublicationFlags {
    let mut flags = PublicationFlags::new();
    for name in names {
        flags.set(name, oracle.flag(name));
    }
    flags
}

/// Store-backed publication flags with change notification.
///
/// Every lookup re-reads the persisted record; nothing is cached between
/// calls.
pub struct PublicationService {
    store: Arc<dyn KeyValueStore>,
    subscribers: Mutex<Vec<Sender<FlagChange>>>,
}

impl PublicationService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Current flags. Unreadable or corrupt records read as "no flags set".
    pub fn flags(&self) -> PublicationFlags {
        let raw = match self.store.get(PUBLICATION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PublicationFlags::default(),
            Err(error) => {
                warn!(error = %error, "Failed to read publication flags; treating all as unpublished");
                return PublicationFlags::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(flags) => flags,
            Err(error) => {
                warn!(error = %error, "Corrupt publication flags record; treating all as unpublished");
                PublicationFlags::default()
            }
        }
    }

    /// Persists a flag and notifies subscribers. Returns `true` when the
    /// value changed; unchanged values are neither written nor announced.
    pub fn set_flag(&self, name: &str, value: bool) -> Result<bool, StoreError> {
        let mut flags = self.flags();
        if !flags.set(name, value) {
            return Ok(false);
        }
        self.store.set(PUBLICATION_KEY, &serde_json::to_string(&flags)?)?;
        info!(flag = name, value, "publication flag changed");

        let change = FlagChange {
            name: name.to_string(),
            value,
        };
        let mut subscribers = self.subscribers.lock().expect("subscriber lock poisoned");
        subscribers.retain(|subscriber| subscriber.send(change.clone()).is_ok());
        Ok(true)
    }

    /// Registers a listener. Dropping the receiver unsubscribes it.
    pub fn subscribe(&self) -> Receiver<FlagChange> {
        let (sender, receiver) = channel();
        self.subscribers.lock().expect("subscriber lock poisoned").push(sender);
        receiver
    }
}

impl PublicationOracle for PublicationService {
    fn flag(&self, name: &str) -> bool {
        self.flags().get(name)
    }
}
