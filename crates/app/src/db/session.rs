//! Session slot.

use super::{KeyValueStore, RepositoryError, Store, keys};
use crate::models::CurrentUser;

impl<B: KeyValueStore> Store<B> {
    /// Read the logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the backend read fails. An
    /// unreadable session reads as logged out.
    pub async fn read_session(&self) -> Result<Option<CurrentUser>, RepositoryError> {
        self.read_document(keys::SESSION).await
    }

    /// Record `user` as the logged-in user, replacing any previous session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if serialization or the backend write fails.
    pub async fn write_session(&self, user: &CurrentUser) -> Result<(), RepositoryError> {
        self.write_document(keys::SESSION, user).await
    }

    /// Forget the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the backend fails.
    pub async fn clear_session(&self) -> Result<(), RepositoryError> {
        self.backend.remove(keys::SESSION).await?;
        Ok(())
    }
}
