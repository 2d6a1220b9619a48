//! Postal code (CEP) lookup client.
//!
//! Resolves a Brazilian postal code to a partial address through a
//! ViaCEP-compatible service.
//!
//! # API Reference
//!
//! - Base URL: `https://viacep.com.br/ws`
//! - Endpoint: `GET {base}/{cep}/json/` with an 8-digit `cep`
//! - Unknown codes answer `200` with `{"erro": true}`

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use cafe_spot_core::validation::postal_code_digits;

use crate::error::{ErrorKind, ValidationError};
use crate::models::LookedUpAddress;

/// Public ViaCEP endpoint.
pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";

/// Errors that can occur during an address lookup.
#[derive(Debug, Error)]
pub enum AddressLookupError {
    /// The postal code doesn't have 8 digits. No request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service doesn't know this postal code.
    #[error("CEP not found: {0}")]
    NotFound(String),

    /// HTTP request failed or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a failure status.
    #[error("address service returned status {0}")]
    Status(u16),

    /// The response body isn't a ViaCEP document.
    #[error("parse error: {0}")]
    Parse(String),
}

impl AddressLookupError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Http(_) | Self::Status(_) | Self::Parse(_) => ErrorKind::Transport,
        }
    }
}

/// Raw ViaCEP response. Every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViaCepResponse {
    logradouro: String,
    bairro: String,
    localidade: String,
    uf: String,
    cep: String,
    /// `true` (or `"true"`) for unknown codes.
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        }
    }

    fn into_address(self, digits: &str) -> LookedUpAddress {
        let zip = if self.cep.trim().is_empty() {
            digits.to_owned()
        } else {
            self.cep
        };

        LookedUpAddress {
            street: self.logradouro,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
            zip,
        }
    }
}

/// Address lookup client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct AddressClient {
    inner: Arc<AddressClientInner>,
}

struct AddressClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AddressClient {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AddressLookupError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(AddressClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        })
    }

    /// Resolve a postal code.
    ///
    /// Non-digits are stripped first, so masked input like `30110-012` works.
    /// Blank fields in the answer stay blank; see
    /// [`CafeInput::apply_address`](crate::models::CafeInput::apply_address).
    ///
    /// # Errors
    ///
    /// Returns `AddressLookupError::Validation` if the code doesn't have 8
    /// digits, `AddressLookupError::NotFound` if the service doesn't know it,
    /// and a transport variant if the service can't be reached or answers
    /// with something unexpected.
    pub async fn lookup(&self, cep: &str) -> Result<LookedUpAddress, AddressLookupError> {
        let digits = postal_code_digits(cep).ok_or(ValidationError::InvalidPostalCode)?;

        let url = format!("{}/{digits}/json/", self.inner.base_url);
        tracing::debug!(%url, "Looking up postal code");

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), cep = %digits, "Address lookup failed");
            return Err(AddressLookupError::Status(status.as_u16()));
        }

        let body: ViaCepResponse = response
            .json()
            .await
            .map_err(|e| AddressLookupError::Parse(format!("Failed to parse response: {e}")))?;

        if body.is_error() {
            return Err(AddressLookupError::NotFound(digits));
        }

        Ok(body.into_address(&digits))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(url: &str) -> AddressClient {
        AddressClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_maps_fields() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/30110012/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"cep":"30110-012","logradouro":"Rua Paraiba","bairro":"Savassi","localidade":"Belo Horizonte","uf":"MG"}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let found = client(&server.url()).lookup("30110-012").await.unwrap();

        assert_eq!(
            found,
            LookedUpAddress {
                street: "Rua Paraiba".to_owned(),
                neighborhood: "Savassi".to_owned(),
                city: "Belo Horizonte".to_owned(),
                state: "MG".to_owned(),
                zip: "30110-012".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_zip_falls_back_to_digits() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/01310100/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"localidade":"Sao Paulo","uf":"SP"}"#)
            .create_async()
            .await;

        let found = client(&format!("{}/", server.url()))
            .lookup("01310100")
            .await
            .unwrap();

        assert_eq!(found.zip, "01310100");
        assert!(found.street.is_empty());
        assert_eq!(found.city, "Sao Paulo");
    }

    #[tokio::test]
    async fn test_lookup_erro_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/99999999/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"erro": "true"}"#)
            .create_async()
            .await;

        let err = client(&server.url()).lookup("99999-999").await.unwrap_err();

        assert!(matches!(err, AddressLookupError::NotFound(ref cep) if cep == "99999999"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_lookup_failure_status_is_transport() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/12345678/json/")
            .with_status(404)
            .create_async()
            .await;

        let err = client(&server.url()).lookup("12345678").await.unwrap_err();

        assert!(matches!(err, AddressLookupError::Status(404)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_lookup_garbage_body_is_transport() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/12345678/json/")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client(&server.url()).lookup("12345678").await.unwrap_err();

        assert!(matches!(err, AddressLookupError::Parse(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_lookup_rejects_short_code_without_request() {
        let mut server = mockito::Server::new_async().await;
        let m = server.mock("GET", mockito::Matcher::Any).expect(0).create_async().await;

        let err = client(&server.url()).lookup("3011-00").await.unwrap_err();

        assert!(matches!(
            err,
            AddressLookupError::Validation(ValidationError::InvalidPostalCode)
        ));
        m.assert_async().await;
    }
}
