//! Domain models for Cafe Spot.
//!
//! Each model has a factory that normalizes raw input into its canonical
//! stored form. Factories are pure: no I/O, no validation failures.
//! Validation happens in the services before a factory is called.

pub mod cafe;
pub mod session;
pub mod user;

pub use cafe::{Address, Cafe, CafeInput, Location, LookedUpAddress, PLACEHOLDER_IMAGE};
pub use session::CurrentUser;
pub use user::{NewUser, User};
