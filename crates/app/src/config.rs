//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CAFE_SPOT_DATA_DIR` - Directory holding the JSON documents (default: `./data`)
//! - `CAFE_SPOT_CEP_BASE_URL` - Address lookup service (default: `https://viacep.com.br/ws`)
//! - `CAFE_SPOT_HTTP_TIMEOUT_SECS` - Lookup request timeout in seconds (default: 10)
//! - `CAFE_SPOT_SEED_ADMIN_EMAIL` - Email of the seeded administrator (default: `admin@cafespot.com`)
//! - `CAFE_SPOT_SEED_ADMIN_PASSWORD` - Password of the seeded administrator (default: `123456`)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use cafe_spot_core::Email;

use crate::db::SeedConfig;
use crate::db::seed::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_NAME, DEFAULT_ADMIN_PASSWORD};
use crate::services::address::DEFAULT_BASE_URL;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cafe Spot application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory of the file-backed store
    pub data_dir: PathBuf,
    /// Base URL of the ViaCEP-compatible lookup service
    pub cep_base_url: String,
    /// Timeout for lookup requests
    pub http_timeout: Duration,
    /// Administrator created on first start
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(get_or_default(&lookup, "CAFE_SPOT_DATA_DIR", DEFAULT_DATA_DIR));

        let cep_base_url = get_or_default(&lookup, "CAFE_SPOT_CEP_BASE_URL", DEFAULT_BASE_URL);
        if !(cep_base_url.starts_with("http://") || cep_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar(
                "CAFE_SPOT_CEP_BASE_URL".to_string(),
                "must be an http(s) URL".to_string(),
            ));
        }

        let timeout_secs = get_or_default(&lookup, "CAFE_SPOT_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CAFE_SPOT_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CAFE_SPOT_HTTP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let admin_email = get_or_default(&lookup, "CAFE_SPOT_SEED_ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL);
        Email::parse(&admin_email).map_err(|e| {
            ConfigError::InvalidEnvVar("CAFE_SPOT_SEED_ADMIN_EMAIL".to_string(), e.to_string())
        })?;

        let admin_password = SecretString::from(get_or_default(
            &lookup,
            "CAFE_SPOT_SEED_ADMIN_PASSWORD",
            DEFAULT_ADMIN_PASSWORD,
        ));

        Ok(Self {
            data_dir,
            cep_base_url,
            http_timeout: Duration::from_secs(timeout_secs),
            seed: SeedConfig {
                admin_name: DEFAULT_ADMIN_NAME.to_string(),
                admin_email,
                admin_password,
            },
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cep_base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(10),
            seed: SeedConfig::default(),
        }
    }
}

/// Get a variable, treating unset and blank alike.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
