//! Cafe collection slot.

use super::{KeyValueStore, RepositoryError, Store, keys};
use crate::models::Cafe;

impl<B: KeyValueStore> Store<B> {
    /// Read the whole cafe collection, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the backend read fails.
    /// Records that don't decode are skipped and logged.
    pub async fn read_cafes(&self) -> Result<Vec<Cafe>, RepositoryError> {
        self.read_collection(keys::CAFES).await
    }

    /// Replace the whole cafe collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if serialization or the backend write fails.
    pub async fn write_cafes(&self, cafes: &[Cafe]) -> Result<(), RepositoryError> {
        self.write_document(keys::CAFES, cafes).await
    }
}
