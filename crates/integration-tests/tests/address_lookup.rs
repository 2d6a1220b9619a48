//! Integration tests for postal code lookup feeding the listing form.

#![allow(clippy::unwrap_used)]

use cafe_spot_app::config::AppConfig;
use cafe_spot_app::{AppError, ErrorKind};
use cafe_spot_integration_tests::{lua_input, memory_context_with};

fn config_for(server: &mockito::ServerGuard) -> AppConfig {
    AppConfig {
        cep_base_url: server.url(),
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn test_lookup_fills_form_and_saves() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/01310100/json/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"cep":"01310-100","logradouro":"Avenida Paulista","bairro":"","localidade":"Sao Paulo","uf":"sp"}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let ctx = memory_context_with(config_for(&server)).await;

    let mut form = lua_input();
    let found = ctx.address().lookup("01310-100").await.unwrap();
    form.apply_address(&found);
    let cafe = ctx.cafes().upsert(form).await.unwrap();

    assert_eq!(cafe.address.street, "Avenida Paulista");
    assert_eq!(cafe.address.neighborhood, "Savassi");
    assert_eq!(cafe.address.city, "Sao Paulo");
    assert_eq!(cafe.address.state, "SP");
    assert_eq!(cafe.address.zip, "01310-100");
    assert_eq!(cafe.address.number, "1");
}

#[tokio::test]
async fn test_unknown_cep_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/00000000/json/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"erro": true}"#)
        .create_async()
        .await;
    let ctx = memory_context_with(config_for(&server)).await;

    let err = AppError::from(ctx.address().lookup("00000-000").await.unwrap_err());

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_service_outage_is_transport_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/30110012/json/")
        .with_status(503)
        .create_async()
        .await;
    let ctx = memory_context_with(config_for(&server)).await;

    let err = AppError::from(ctx.address().lookup("30110012").await.unwrap_err());

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_malformed_cep_is_rejected_locally() {
    let server = mockito::Server::new_async().await;
    let ctx = memory_context_with(config_for(&server)).await;

    let err = AppError::from(ctx.address().lookup("123").await.unwrap_err());

    assert_eq!(err.kind(), ErrorKind::Validation);
}
