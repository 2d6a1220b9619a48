//! User domain types.

use serde::{Deserialize, Serialize};

use cafe_spot_core::{Email, UserId, UserType};

/// A registered account, as stored in the user collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Trimmed display name.
    pub name: String,
    /// Normalized (trimmed, lower-cased) email address.
    pub email: Email,
    /// Argon2 PHC string.
    ///
    /// Older documents store the plain password under `password`; seeding
    /// replaces those with a hash.
    #[serde(alias = "password")]
    pub password_hash: String,
    /// Role of the account.
    #[serde(rename = "type", default)]
    pub user_type: UserType,
}

/// Input to [`User::new`].
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    /// Display name, trimmed by the factory.
    pub name: &'a str,
    /// Already-normalized email.
    pub email: Email,
    /// Hash of the password. The password itself is never stored.
    pub password_hash: String,
    /// Role; `None` means [`UserType::Client`].
    pub user_type: Option<UserType>,
}

impl User {
    /// Build a user with a freshly minted ID.
    #[must_use]
    pub fn new(input: NewUser<'_>) -> Self {
        Self {
            id: UserId::generate(),
            name: input.name.trim().to_owned(),
            email: input.email,
            password_hash: input.password_hash,
            user_type: input.user_type.unwrap_or_default(),
        }
    }
}
