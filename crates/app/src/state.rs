//! Application context shared by front ends.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{FileStore, KeyValueStore, SeedReport, Store};
use crate::error::AppError;
use crate::models::CurrentUser;
use crate::services::{AddressClient, AuthService, CafeService};

/// Application context.
///
/// This struct is cheaply cloneable via `Arc` and gives access to the
/// store, the configuration and the address lookup client.
pub struct AppContext<B = FileStore> {
    inner: Arc<AppContextInner<B>>,
}

struct AppContextInner<B> {
    config: AppConfig,
    store: Store<B>,
    address: AddressClient,
}

impl<B> Clone for AppContext<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AppContext<FileStore> {
    /// Create a context backed by files under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let backend = FileStore::new(config.data_dir.clone());
        Self::with_backend(config, backend)
    }
}

impl<B: KeyValueStore> AppContext<B> {
    /// Create a context over an arbitrary backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_backend(config: AppConfig, backend: B) -> Result<Self, AppError> {
        let address = AddressClient::new(&config.cep_base_url, config.http_timeout)?;

        Ok(Self {
            inner: Arc::new(AppContextInner {
                config,
                store: Store::new(backend),
                address,
            }),
        })
    }

    /// Seed empty collections and restore the persisted session.
    ///
    /// Run once at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding fails or the store can't be read.
    pub async fn bootstrap(&self) -> Result<(SeedReport, Option<CurrentUser>), AppError> {
        let report = self.store().seed_defaults(&self.inner.config.seed).await?;
        let session = self.store().read_session().await?;

        tracing::debug!(
            admin_created = report.admin_created,
            cafes_inserted = report.cafes_inserted,
            logged_in = session.is_some(),
            "Bootstrapped"
        );
        Ok((report, session))
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &Store<B> {
        &self.inner.store
    }

    /// Get a reference to the address lookup client.
    #[must_use]
    pub fn address(&self) -> &AddressClient {
        &self.inner.address
    }

    /// Authentication service over this context's store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_, B> {
        AuthService::new(self.store())
    }

    /// Listing service over this context's store.
    #[must_use]
    pub fn cafes(&self) -> CafeService<'_, B> {
        CafeService::new(self.store())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_bootstrap_seeds_once() {
        let ctx = AppContext::with_backend(AppConfig::default(), MemoryStore::new()).unwrap();

        let (first, session) = ctx.bootstrap().await.unwrap();
        assert!(first.admin_created);
        assert_eq!(first.cafes_inserted, 2);
        assert!(session.is_none());

        let (second, _) = ctx.clone().bootstrap().await.unwrap();
        assert_eq!(second, SeedReport::default());
    }

    #[tokio::test]
    async fn test_bootstrap_restores_session() {
        let ctx = AppContext::with_backend(AppConfig::default(), MemoryStore::new()).unwrap();
        ctx.bootstrap().await.unwrap();

        let admin = ctx
            .auth()
            .login("admin@cafespot.com", &"123456".into())
            .await
            .unwrap();

        let (_, session) = ctx.bootstrap().await.unwrap();
        assert_eq!(session, Some(admin));
    }

    #[tokio::test]
    async fn test_from_config_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };

        let ctx = AppContext::from_config(config).unwrap();
        ctx.bootstrap().await.unwrap();

        assert_eq!(ctx.store().backend().dir(), dir.path());
        assert!(dir.path().join("cafe_spot_users.json").exists());
        assert!(dir.path().join("cafe_spot_cafes.json").exists());
    }
}
