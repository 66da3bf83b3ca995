//! Storage backends, settings and path helpers shared by the Selftape crates.

pub mod kv_store;
pub mod path_processing;
pub mod settings;

pub use kv_store::{InMemoryStore, JsonFileStore, KeyValueStore, STORE_PATH_ENV, StoreError, default_store_path};
pub use path_processing::{config_root, expand_tilde};
pub use settings::{AppSettings, SETTINGS_PATH_ENV};
