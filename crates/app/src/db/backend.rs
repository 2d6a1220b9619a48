//! Key-value backends holding the raw JSON documents.
//!
//! A backend knows nothing about users or cafes: it maps a slot key to an
//! opaque string. [`Store`](super::Store) layers typed (de)serialization on top.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

/// Asynchronous string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    fn get(&self, key: &str) -> impl Future<Output = io::Result<Option<String>>> + Send;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: String) -> impl Future<Output = io::Result<()>> + Send;

    /// Empty the slot. Removing an empty slot is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = io::Result<()>> + Send;
}

/// Stores each slot as `<key>.json` inside a data directory.
///
/// The directory is created on first write. Writes go through a temporary
/// file and a rename so a crash never leaves a half-written document.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set(&self, key: &str, value: String) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await
    }

    async fn remove(&self, key: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Process-local backend. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> io::Result<()> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Memory backend whose writes to chosen slots fail, for exercising error
/// paths.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    failing: tokio::sync::Mutex<std::collections::HashSet<String>>,
}

#[cfg(test)]
impl FlakyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make every later `set` or `remove` on `key` fail.
    pub(crate) async fn fail_writes_to(&self, key: &str) {
        self.failing.lock().await.insert(key.to_owned());
    }

    async fn check(&self, key: &str) -> io::Result<()> {
        if self.failing.lock().await.contains(key) {
            return Err(io::Error::other(format!("write to {key} refused")));
        }
        Ok(())
    }
}

#[cfg(test)]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> io::Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> io::Result<()> {
        self.check(key).await?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> io::Result<()> {
        self.check(key).await?;
        self.inner.remove(key).await
    }
}
