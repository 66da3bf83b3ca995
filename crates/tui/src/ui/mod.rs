//! Terminal UI: components, top-level layout and the event loop.

pub mod components;
pub mod main_component;
pub mod runtime;
