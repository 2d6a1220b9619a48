//! Local persistence for Cafe Spot.
//!
//! # Slots
//!
//! Three JSON documents, each under a fixed key:
//!
//! - `cafe_spot_users` - array of [`User`](crate::models::User)
//! - `cafe_spot_cafes` - array of [`Cafe`](crate::models::Cafe)
//! - `cafe_spot_session` - a single [`CurrentUser`](crate::models::CurrentUser), or absent
//!
//! Callers never patch a document: every mutation re-reads the whole
//! collection, changes it and writes it back. [`Store::lock_users`] and
//! [`Store::lock_cafes`] serialize those cycles within a process.
//!
//! # Corruption
//!
//! Collections decode record by record: a record that doesn't decode is
//! logged and skipped, the rest are returned. A collection document that
//! isn't an array reads as empty, and an unreadable session reads as absent.
//! Skipped records are dropped the next time the collection is written.
//! Backend I/O failures are always returned to the caller.
//!
//! Seeding never overwrites a slot that holds data, readable or not; see
//! [`Store::seed_defaults`].

mod backend;
mod cafes;
pub mod seed;
mod session;
mod users;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
#[cfg(test)]
pub(crate) use backend::FlakyStore;
pub use seed::{SeedConfig, SeedReport};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

/// Slot keys.
pub mod keys {
    /// User collection.
    pub const USERS: &str = "cafe_spot_users";

    /// Cafe collection.
    pub const CAFES: &str = "cafe_spot_cafes";

    /// Currently logged-in user.
    pub const SESSION: &str = "cafe_spot_session";
}

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backend could not be read or written.
    #[error("storage backend error: {0}")]
    Backend(#[from] std::io::Error),

    /// A document could not be serialized for writing.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Typed access to the three slots over a [`KeyValueStore`].
#[derive(Debug)]
pub struct Store<B> {
    backend: B,
    users_lock: Mutex<()>,
    cafes_lock: Mutex<()>,
}

impl<B: KeyValueStore> Store<B> {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            users_lock: Mutex::new(()),
            cafes_lock: Mutex::new(()),
        }
    }

    /// The underlying backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Exclusive right to read-modify-write the user collection.
    ///
    /// The guard is advisory: plain reads and writes don't take it.
    pub async fn lock_users(&self) -> MutexGuard<'_, ()> {
        self.users_lock.lock().await
    }

    /// Exclusive right to read-modify-write the cafe collection.
    pub async fn lock_cafes(&self) -> MutexGuard<'_, ()> {
        self.cafes_lock.lock().await
    }

    /// Read and decode a slot.
    ///
    /// Returns `Ok(None)` for an empty slot, a literal `null`, or a document
    /// that doesn't decode as `T`.
    async fn read_document<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, RepositoryError> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(slot = key, error = %e, "Discarding unreadable stored document");
                Ok(None)
            }
        }
    }

    /// Read a collection slot, decoding each record on its own.
    async fn read_collection<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Vec<T>, RepositoryError> {
        let Some(records) = self.read_document::<Vec<serde_json::Value>>(key).await? else {
            return Ok(Vec::new());
        };

        let mut decoded = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value(record) {
                Ok(value) => decoded.push(value),
                Err(e) => {
                    tracing::warn!(slot = key, index, error = %e, "Skipping unreadable stored record");
                }
            }
        }
        Ok(decoded)
    }

    /// Whether a slot holds nothing: no value, a blank value, `null` or `[]`.
    ///
    /// Anything else, including text that isn't JSON, counts as occupied.
    async fn slot_is_vacant(&self, key: &str) -> Result<bool, RepositoryError> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(true);
        };
        if raw.trim().is_empty() {
            return Ok(true);
        }

        Ok(match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Null) => true,
            Ok(serde_json::Value::Array(items)) => items.is_empty(),
            _ => false,
        })
    }

    async fn write_document<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, raw).await?;
        Ok(())
    }
}
