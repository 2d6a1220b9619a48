//! Authentication service.
//!
//! The session slot is a two-state machine: anonymous until `register` or
//! `login` succeeds, authenticated until `logout`. Passwords are stored as
//! Argon2id hashes and only ever compared through the verifier.

mod error;

pub use error::{AuthError, PasswordHashError};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use cafe_spot_core::Email;
use cafe_spot_core::validation::required_fields_filled;

use crate::db::{KeyValueStore, Store};
use crate::error::ValidationError;
use crate::models::{CurrentUser, NewUser, User};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Sign-up form.
///
/// Implements `Debug` through `SecretString`, which redacts the password.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

/// Authentication service.
///
/// Handles registration, login, logout and session lookup.
pub struct AuthService<'a, B> {
    store: &'a Store<B>,
}

impl<'a, B: KeyValueStore> AuthService<'a, B> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a Store<B>) -> Self {
        Self { store }
    }

    /// Register a new client account and log it in.
    ///
    /// Checks run in order and stop at the first failure: required fields,
    /// email shape, password length, then email uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is incomplete or malformed.
    /// Returns `AuthError::EmailTaken` if the email is already registered,
    /// regardless of letter case.
    /// Returns `AuthError::Repository` if the store fails. When the session
    /// can't be written, the new account is removed again.
    pub async fn register(&self, form: &Registration) -> Result<CurrentUser, AuthError> {
        let password = form.password.expose_secret();

        if !required_fields_filled(&[form.name.as_str(), form.email.as_str(), password]) {
            let missing = [
                ("name", form.name.as_str()),
                ("email", form.email.as_str()),
                ("password", password),
            ]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect();
            return Err(ValidationError::MissingFields(missing).into());
        }

        let email = Email::parse(&form.email).map_err(|_| ValidationError::InvalidEmail)?;

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            }
            .into());
        }

        let _guard = self.store.lock_users().await;
        let mut users = self.store.read_users().await?;

        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let user = User::new(NewUser {
            name: &form.name,
            email,
            password_hash: hash_password(password)?,
            user_type: None,
        });
        let current = CurrentUser::from(&user);

        users.push(user);
        self.store.write_users(&users).await?;

        // No account without its session: undo the insert if the login half fails.
        if let Err(e) = self.store.write_session(&current).await {
            users.pop();
            if let Err(rollback) = self.store.write_users(&users).await {
                tracing::error!(user_id = %current.id, error = %rollback, "Failed to roll back new account");
            }
            return Err(e.into());
        }

        tracing::info!(user_id = %current.id, "Registered new account");
        Ok(current)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if either field is blank.
    /// Returns `AuthError::InvalidCredentials` if no account matches; the
    /// same error is used for an unknown email and a wrong password.
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<CurrentUser, AuthError> {
        let password = password.expose_secret();
        if !required_fields_filled(&[email, password]) {
            return Err(ValidationError::MissingCredentials.into());
        }

        let users = self.store.read_users().await?;
        let user = users
            .iter()
            .find(|u| u.email.matches(email))
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        let current = CurrentUser::from(user);
        self.store.write_session(&current).await?;

        tracing::info!(user_id = %current.id, "Logged in");
        Ok(current)
    }

    /// End the current session. Succeeds when already logged out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.store.clear_session().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// The logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn current(&self) -> Result<Option<CurrentUser>, AuthError> {
        Ok(self.store.read_session().await?)
    }
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordHashError)
}

/// Whether `value` is a PHC hash string rather than a stored plain password.
pub(crate) fn is_password_hash(value: &str) -> bool {
    PasswordHash::new(value).is_ok_and(|parsed| parsed.hash.is_some())
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
