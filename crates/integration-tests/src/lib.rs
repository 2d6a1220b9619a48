//! Integration tests for Cafe Spot.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cafe-spot-integration-tests
//! ```
//!
//! No external services are needed: stores are in-memory or in a temporary
//! directory, and address lookups go to a local mock server.
//!
//! # Test Categories
//!
//! - `auth_flow` - registration, login and session lifecycle
//! - `cafe_management` - listing CRUD, visibility and likes
//! - `persistence` - file-backed storage across restarts
//! - `address_lookup` - postal code lookup feeding the listing form

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::Path;

use secrecy::SecretString;

use cafe_spot_app::config::AppConfig;
use cafe_spot_app::db::{FileStore, MemoryStore};
use cafe_spot_app::models::{CafeInput, CurrentUser};
use cafe_spot_app::services::Registration;
use cafe_spot_app::AppContext;

/// Password of the seeded administrator in tests.
pub const ADMIN_PASSWORD: &str = "123456";

/// Email of the seeded administrator in tests.
pub const ADMIN_EMAIL: &str = "admin@cafespot.com";

/// Bootstrapped context over an in-memory store.
pub async fn memory_context() -> AppContext<MemoryStore> {
    memory_context_with(AppConfig::default()).await
}

/// Bootstrapped in-memory context with a custom configuration.
pub async fn memory_context_with(config: AppConfig) -> AppContext<MemoryStore> {
    let ctx = AppContext::with_backend(config, MemoryStore::new()).unwrap();
    ctx.bootstrap().await.unwrap();
    ctx
}

/// Bootstrapped context storing its documents under `dir`.
pub async fn file_context(dir: &Path) -> AppContext<FileStore> {
    let config = AppConfig {
        data_dir: dir.to_path_buf(),
        ..AppConfig::default()
    };
    let ctx = AppContext::from_config(config).unwrap();
    ctx.bootstrap().await.unwrap();
    ctx
}

/// Sign-up form.
#[must_use]
pub fn registration(name: &str, email: &str, password: &str) -> Registration {
    Registration {
        name: name.to_owned(),
        email: email.to_owned(),
        password: SecretString::from(password),
    }
}

/// Log in as the seeded administrator.
pub async fn login_admin(ctx: &AppContext<MemoryStore>) -> CurrentUser {
    ctx.auth()
        .login(ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD))
        .await
        .unwrap()
}

/// A complete listing payload in Belo Horizonte.
#[must_use]
pub fn lua_input() -> CafeInput {
    CafeInput {
        name: "Lua".to_owned(),
        description: "Cafe de bairro".to_owned(),
        street: "Rua A".to_owned(),
        number: "1".to_owned(),
        zip: "30110-012".to_owned(),
        neighborhood: "Savassi".to_owned(),
        city: "Belo Horizonte".to_owned(),
        state: "mg".to_owned(),
        latitude: "-19.93".to_owned(),
        longitude: "-43.93".to_owned(),
        cnpj: "12345678000190".to_owned(),
        average_ticket: "R$ 25".to_owned(),
        ..CafeInput::default()
    }
}
