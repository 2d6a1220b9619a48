//! Session-related types.

use serde::{Deserialize, Serialize};

use cafe_spot_core::{Email, UserId, UserType};

use super::User;

/// Session-stored user identity.
///
/// Minimal data kept in the session slot to identify the logged-in user.
/// Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// User's ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Role, which decides the reachable actions.
    #[serde(rename = "type")]
    pub user_type: UserType,
}

impl CurrentUser {
    /// Whether the user is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.user_type, UserType::Admin)
    }

    /// Whether the user may create, edit, deactivate or remove listings.
    #[must_use]
    pub const fn can_manage_cafes(&self) -> bool {
        self.user_type.can_manage_cafes()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            user_type: user.user_type,
        }
    }
}
