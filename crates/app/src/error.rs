//! Unified error handling for Cafe Spot.
//!
//! Each service has its own error enum. [`AppError`] wraps them all so a
//! front end can handle every failure in one place, and [`AppError::kind`]
//! classifies them for display.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::db::seed::SeedError;
use crate::services::address::AddressLookupError;
use crate::services::auth::AuthError;
use crate::services::cafes::CafeError;

/// Missing or malformed user input.
///
/// Messages name the failed constraint so the user can correct it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are blank.
    #[error("required fields are missing: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Login without both email and password.
    #[error("email and password are required")]
    MissingCredentials,

    /// Email doesn't look like `local@domain.tld`.
    #[error("invalid email address")]
    InvalidEmail,

    /// Password shorter than the minimum.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length in characters.
        min: usize,
    },

    /// CNPJ without exactly 14 digits.
    #[error("CNPJ must have 14 digits")]
    InvalidTaxId,

    /// CEP without exactly 8 digits.
    #[error("CEP must have 8 digits")]
    InvalidPostalCode,
}

/// Broad category of an error, for deciding how to present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input must be corrected.
    Validation,
    /// A unique key is already taken.
    Conflict,
    /// Credentials were rejected.
    Auth,
    /// The session's role doesn't allow the action.
    Forbidden,
    /// The target doesn't exist.
    NotFound,
    /// An external service failed; retrying may help.
    Transport,
    /// Local storage failed.
    Storage,
    /// Configuration is invalid.
    Config,
    /// Anything else.
    Internal,
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Registration, login or logout failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A listing operation failed.
    #[error(transparent)]
    Cafe(#[from] CafeError),

    /// Postal code lookup failed.
    #[error(transparent)]
    AddressLookup(#[from] AddressLookupError),

    /// Seeding default data failed.
    #[error(transparent)]
    Seed(#[from] SeedError),

    /// Direct store access failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input rejected before reaching a service.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The current session may not perform the action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Interactive input could not be read.
    #[error("could not read input: {0}")]
    Prompt(#[source] std::io::Error),
}

impl AppError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(e) => e.kind(),
            Self::Cafe(e) => e.kind(),
            Self::AddressLookup(e) => e.kind(),
            Self::Seed(SeedError::Repository(_)) | Self::Repository(_) => ErrorKind::Storage,
            Self::Seed(SeedError::InvalidEmail(_)) | Self::Config(_) => ErrorKind::Config,
            Self::Seed(SeedError::PasswordHash(_)) | Self::Prompt(_) => ErrorKind::Internal,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Forbidden(_) => ErrorKind::Forbidden,
        }
    }

    /// Whether the user can fix the problem by changing input or retrying.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::Storage | ErrorKind::Config | ErrorKind::Internal
        )
    }
}
