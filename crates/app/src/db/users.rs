//! User collection slot.

use super::{KeyValueStore, RepositoryError, Store, keys};
use crate::models::User;

impl<B: KeyValueStore> Store<B> {
    /// Read the whole user collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the backend read fails.
    /// Records that don't decode are skipped and logged.
    pub async fn read_users(&self) -> Result<Vec<User>, RepositoryError> {
        self.read_collection(keys::USERS).await
    }

    /// Replace the whole user collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if serialization or the backend write fails.
    pub async fn write_users(&self, users: &[User]) -> Result<(), RepositoryError> {
        self.write_document(keys::USERS, users).await
    }
}
