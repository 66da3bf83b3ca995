use selftape_types::Role;
use thiserror::Error;

/// Reasons a menu edit is rejected. A rejected edit never writes to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Only administrators may edit menus.
    #[error("{editor} is not allowed to edit navigation menus")]
    NotAuthorized { editor: Role },
    /// The administrator menu is fixed; admins manage the other roles' menus.
    #[error("the {role} menu cannot be edited")]
    LockedMenu { role: Role },
    /// The role has no navigation surface.
    #[error("{role} has no navigation menu")]
    NoNavigation { role: Role },
    #[error("{role} menu has no item '{id}'")]
    UnknownItem { role: Role, id: String },
    /// Visibility and disabled state of this item follow a publication flag.
    #[error("'{id}' is controlled by the '{flag}' publication flag")]
    PublicationControlled { id: String, flag: String },
}
