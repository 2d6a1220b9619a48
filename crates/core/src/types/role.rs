//! User types and their permissions.

use serde::{Deserialize, Serialize};

/// Role of an account.
///
/// Clients browse and like listings; admins also manage them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Regular account: read and like only.
    #[default]
    #[serde(alias = "Cliente")]
    Client,
    /// Can create, edit, deactivate and remove listings.
    #[serde(alias = "Admin")]
    Admin,
}

impl UserType {
    /// Whether this role may create, edit, deactivate or remove listings.
    #[must_use]
    pub const fn can_manage_cafes(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user type: {s}")),
        }
    }
}
