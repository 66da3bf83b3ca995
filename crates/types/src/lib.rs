//! Shared type definitions for the Selftape navigation model.
//!
//! The types in this crate are the storage contract for persisted sidebar
//! configuration: field names serialize in camelCase and must stay stable for
//! any external tool inspecting persisted storage.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod navigation;
pub mod publication;

pub use navigation::{ItemPresentation, NavItemState, NavItemTemplate, PublicationOverride, RoleNavConfig};
pub use publication::{COURSES_PUBLISHED, FlagChange, PublicationFlags};

/// A platform role. Each role owns at most one sidebar configuration.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Submits self-tapes and enrolls in courses.
    Actor,
    /// Reviews submissions and runs sessions.
    Tutor,
    /// Manages users, themes and the menus of every other role.
    Admin,
    /// Unauthenticated visitor. Has no navigation surface.
    Guest,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Actor, Role::Tutor, Role::Admin, Role::Guest];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Tutor => "tutor",
            Self::Admin => "admin",
            Self::Guest => "guest",
        }
    }

    /// Whether the role has a sidebar at all. Roles without one never get a
    /// persisted configuration.
    pub fn has_navigation(self) -> bool {
        !matches!(self, Self::Guest)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Roles whose menus an administrator can edit.
    pub fn editable() -> impl Iterator<Item = Role> {
        Self::ALL.into_iter().filter(|role| role.has_navigation() && !role.is_admin())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "actor" => Ok(Self::Actor),
            "tutor" => Ok(Self::Tutor),
            "admin" | "administrator" => Ok(Self::Admin),
            "guest" => Ok(Self::Guest),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(pub String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid role '{}'; expected actor, tutor, admin or guest", self.0)
    }
}

impl Error for ParseRoleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively_with_alias() {
        assert_eq!("Actor".parse::<Role>(), Ok(Role::Actor));
        assert_eq!(" administrator ".parse::<Role>(), Ok(Role::Admin));
        assert!("producer".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Tutor).unwrap(), "\"tutor\"");
        let parsed: Role = serde_json::from_str("\"guest\"").unwrap();
        assert_eq!(parsed, Role::Guest);
    }

    #[test]
    fn editable_roles_exclude_admin_and_guest() {
        let editable: Vec<Role> = Role::editable().collect();
        assert_eq!(editable, vec![Role::Actor, Role::Tutor]);
    }
}
