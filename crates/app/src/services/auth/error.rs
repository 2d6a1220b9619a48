//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::error::{ErrorKind, ValidationError};

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration or login input is incomplete or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another account already uses this email.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// Wrong email or wrong password. Deliberately doesn't say which.
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),

    /// Reading or writing the store failed.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The password hasher failed.
#[derive(Debug, Error)]
#[error("password hashing error")]
pub struct PasswordHashError;

impl AuthError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::EmailTaken => ErrorKind::Conflict,
            Self::InvalidCredentials => ErrorKind::Auth,
            Self::PasswordHash(_) => ErrorKind::Internal,
            Self::Repository(_) => ErrorKind::Storage,
        }
    }
}
