//! Publication flags: runtime booleans gating features independently of any
//! per-user menu customization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Flag set once the course catalog is published to actors and tutors.
pub const COURSES_PUBLISHED: &str = "coursesPublished";

/// Named publication flags. Flags that were never set read as `false`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationFlags {
    flags: IndexMap<String, bool>,
}

impl PublicationFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter used by tests and static configurations.
    pub fn with(mut self, name: impl Into<String>, value: bool) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Sets a flag and returns `true` when the stored value changed.
    pub fn set(&mut self, name: impl Into<String>, value: bool) -> bool {
        let name = name.into();
        let previous = self.get(&name);
        self.flags.insert(name, value);
        previous != value
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Notification emitted when a publication flag changes value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagChange {
    pub name: String,
    pub value: bool,
}
