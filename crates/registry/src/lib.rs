//! Registry crate holding the master catalog of sidebar entries.
//!
//! The catalog is compiled into the binary, versioned, and never changes at
//! runtime. This crate answers which templates a role is offered, resolves
//! dynamic paths, and evaluates publication gates against a flag snapshot.

pub mod dynamic_path;
pub mod feat_gate;
pub mod models;

pub use dynamic_path::{DEFAULT_SENTINEL, has_placeholders, placeholders, resolve_dynamic_path, resolve_path, resolve_state_path};
pub use models::{EMBEDDED_CATALOG, RegistryError, TemplateRegistry};
