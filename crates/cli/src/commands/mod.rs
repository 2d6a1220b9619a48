//! Command implementations.
//!
//! The CLI stands in for the screens of the app, so it also decides which
//! actions a session can reach.

pub mod auth;
pub mod cafe;
pub mod cep;

use cafe_spot_app::AppError;
use cafe_spot_app::models::CurrentUser;

/// The session, if it may create, edit, deactivate or remove listings.
fn require_admin(session: Option<&CurrentUser>) -> Result<&CurrentUser, AppError> {
    match session {
        Some(user) if user.can_manage_cafes() => Ok(user),
        Some(_) => Err(AppError::Forbidden(
            "only administrators can manage listings".to_owned(),
        )),
        None => Err(AppError::Forbidden(
            "log in as an administrator first".to_owned(),
        )),
    }
}

/// The session, if there is one.
fn require_session(session: Option<&CurrentUser>) -> Result<&CurrentUser, AppError> {
    session.ok_or_else(|| AppError::Forbidden("log in first".to_owned()))
}
