//! Business logic services.

pub mod address;
pub mod auth;
pub mod cafes;

pub use address::{AddressClient, AddressLookupError};
pub use auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH, Registration};
pub use cafes::{CafeError, CafeService};
