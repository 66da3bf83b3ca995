//! # Selftape Navigation Engine
//!
//! Produces the authoritative sidebar of each role by merging three inputs:
//! the compiled-in template catalog, persisted admin edits, and live
//! publication flags. The merged list is written back explicitly by the
//! caller, never implicitly on read.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use selftape_engine::{NavigationService, PublicationService};
//! use selftape_registry::TemplateRegistry;
//! use selftape_types::Role;
//! use selftape_util::{InMemoryStore, KeyValueStore};
//!
//! let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
//! let flags = Arc::new(PublicationService::new(store.clone()));
//! let registry = Arc::new(TemplateRegistry::embedded()?);
//! let service = NavigationService::new(registry, store, flags);
//!
//! let actor = service.role_config(Role::Actor);
//! for item in actor.visible_items() {
//!     println!("{} -> {}", item.display_title(), item.path);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`oracle`**: publication flag lookups and the store-backed flag service
//! - **`config_store`**: per-role persisted configuration
//! - **`reconcile`**: the merge algorithm
//! - **`reorder`**: dense drag-reorder of a role's list
//! - **`service`**: authorization and write-back around the above
//! - **`collaborators`**: identity and notification counter interfaces

pub mod collaborators;
pub mod config_store;
pub mod error;
pub mod oracle;
pub mod reconcile;
pub mod reorder;
pub mod service;

pub use collaborators::{Identity, IdentityProvider, NoNotifications, NotificationCounter, StaticIdentity, StoredNotificationCounter};
pub use config_store::{NAV_KEY_PREFIX, NavConfigStore, storage_key};
pub use error::EditError;
pub use oracle::{PUBLICATION_KEY, PublicationOracle, PublicationService, snapshot};
pub use reconcile::reconcile;
pub use reorder::move_item;
pub use service::{EditOutcome, NavigationService};
