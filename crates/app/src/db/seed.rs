//! Default data for a fresh installation.
//!
//! [`Store::seed_defaults`] is safe to call on every start: a collection is
//! only seeded while its slot is vacant (absent, `null` or `[]`). A slot
//! holding anything else is left alone, even when none of it decodes.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use cafe_spot_core::{Email, EmailError, UserType};

use super::{KeyValueStore, RepositoryError, Store, keys};
use crate::models::{Cafe, CafeInput, NewUser, User};
use crate::services::auth::{PasswordHashError, hash_password, is_password_hash};

/// Email of the default administrator.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@cafespot.com";

/// Password of the default administrator.
pub const DEFAULT_ADMIN_PASSWORD: &str = "123456";

/// Display name of the default administrator.
pub const DEFAULT_ADMIN_NAME: &str = "Admin Cafespot";

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The configured admin email is malformed.
    #[error("invalid seed admin email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The admin password could not be hashed.
    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),

    /// Reading or writing a collection failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Credentials of the administrator created on first start.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SeedConfig {
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: SecretString,
}

impl std::fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedConfig")
            .field("admin_name", &self.admin_name)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &"[REDACTED]")
            .finish()
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_name: DEFAULT_ADMIN_NAME.to_owned(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_owned(),
            admin_password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
        }
    }
}

/// What a seeding pass inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Whether the administrator account was created.
    pub admin_created: bool,
    /// Number of example listings inserted.
    pub cafes_inserted: usize,
    /// Number of stored plain passwords replaced with a hash.
    pub passwords_upgraded: usize,
}

impl<B: KeyValueStore> Store<B> {
    /// Insert the default administrator and example listings into vacant
    /// slots, and hash any plain passwords left by older versions.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the admin email is invalid, hashing fails, or
    /// the store cannot be read or written.
    pub async fn seed_defaults(&self, config: &SeedConfig) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport::default();

        {
            let _guard = self.lock_users().await;
            if self.slot_is_vacant(keys::USERS).await? {
                let admin = User::new(NewUser {
                    name: &config.admin_name,
                    email: Email::parse(&config.admin_email)?,
                    password_hash: hash_password(config.admin_password.expose_secret())?,
                    user_type: Some(UserType::Admin),
                });
                tracing::info!(email = %admin.email, "Seeding default administrator");
                self.write_users(&[admin]).await?;
                report.admin_created = true;
            } else {
                report.passwords_upgraded = self.upgrade_plain_passwords().await?;
            }
        }

        {
            let _guard = self.lock_cafes().await;
            if self.slot_is_vacant(keys::CAFES).await? {
                let cafes: Vec<Cafe> = example_cafes().into_iter().map(Cafe::new).collect();
                tracing::info!(count = cafes.len(), "Seeding example listings");
                self.write_cafes(&cafes).await?;
                report.cafes_inserted = cafes.len();
            } else if self.read_cafes().await?.is_empty() {
                tracing::warn!(slot = keys::CAFES, "Cafe slot holds no readable listings; not seeding over it");
            }
        }

        Ok(report)
    }

    /// Hash every stored password that isn't a hash yet. Caller holds the
    /// users lock.
    async fn upgrade_plain_passwords(&self) -> Result<usize, SeedError> {
        let mut users = self.read_users().await?;
        if users.is_empty() {
            tracing::warn!(slot = keys::USERS, "User slot holds no readable accounts; not seeding over it");
            return Ok(0);
        }

        let mut upgraded = 0;
        for user in users.iter_mut().filter(|u| !is_password_hash(&u.password_hash)) {
            user.password_hash = hash_password(&user.password_hash)?;
            upgraded += 1;
        }

        if upgraded > 0 {
            self.write_users(&users).await?;
            tracing::info!(count = upgraded, "Hashed stored plain passwords");
        }
        Ok(upgraded)
    }
}

fn example_cafes() -> [CafeInput; 2] {
    [
        CafeInput {
            name: "Lua Alta Cafe".to_owned(),
            description: "Torrefacao autoral com graos locais e doces artesanais.".to_owned(),
            street: "Rua Paraiba".to_owned(),
            number: "120".to_owned(),
            zip: "30110-012".to_owned(),
            neighborhood: "Savassi".to_owned(),
            city: "Belo Horizonte".to_owned(),
            state: "MG".to_owned(),
            latitude: "-19.9372".to_owned(),
            longitude: "-43.9329".to_owned(),
            cnpj: "12.345.678/0001-90".to_owned(),
            average_ticket: "R$ 28".to_owned(),
            image_url: Some(
                "https://images.unsplash.com/photo-1509042239860-f550ce710b93?w=1200".to_owned(),
            ),
            ..CafeInput::default()
        },
        CafeInput {
            name: "Brisa Cafe Lab".to_owned(),
            description: "Cold brew, musica indie e mesas colaborativas.".to_owned(),
            street: "Av. Paulista".to_owned(),
            number: "1400".to_owned(),
            zip: "01310-100".to_owned(),
            neighborhood: "Bela Vista".to_owned(),
            city: "Sao Paulo".to_owned(),
            state: "SP".to_owned(),
            latitude: "-23.5614".to_owned(),
            longitude: "-46.6560".to_owned(),
            cnpj: "98.765.432/0001-01".to_owned(),
            average_ticket: "R$ 32".to_owned(),
            image_url: Some(
                "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=1200".to_owned(),
            ),
            ..CafeInput::default()
        },
    ]
}
