//! Integration tests for the file-backed store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use secrecy::SecretString;

use cafe_spot_app::db::FileStore;
use cafe_spot_app::models::{Cafe, User};
use cafe_spot_core::UserType;
use cafe_spot_integration_tests::{file_context, lua_input, registration};

#[tokio::test]
async fn test_data_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let (client, cafe) = {
        let ctx = file_context(dir.path()).await;
        let client = ctx
            .auth()
            .register(&registration("Ana", "ana@example.com", "1234"))
            .await
            .unwrap();
        let cafe = ctx.cafes().upsert(lua_input()).await.unwrap();
        ctx.cafes().toggle_like(&cafe.id, &client.id).await.unwrap();
        (client, cafe)
    };

    let ctx = file_context(dir.path()).await;
    let (report, session) = ctx.bootstrap().await.unwrap();

    assert!(!report.admin_created);
    assert_eq!(report.cafes_inserted, 0);
    assert_eq!(session, Some(client.clone()));

    let stored = ctx.cafes().get(&cafe.id).await.unwrap().unwrap();
    assert!(stored.is_liked_by(&client.id));
    assert_eq!(ctx.store().read_users().await.unwrap().len(), 2);

    ctx.auth().logout().await.unwrap();
    let again = ctx
        .auth()
        .login("ana@example.com", &SecretString::from("1234"))
        .await
        .unwrap();
    assert_eq!(again, client);
}

#[tokio::test]
async fn test_documents_use_camel_case_layout() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = file_context(dir.path()).await;
    ctx.cafes().upsert(lua_input()).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("cafe_spot_cafes.json")).unwrap();
    let cafes: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let lua = &cafes[2];
    assert_eq!(lua["averageTicket"], "R$ 25");
    assert_eq!(lua["address"]["state"], "MG");
    assert_eq!(lua["likedBy"], serde_json::json!([]));
    assert_eq!(lua["active"], true);

    let raw = std::fs::read_to_string(dir.path().join("cafe_spot_users.json")).unwrap();
    let users: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(users[0]["type"], "admin");
    assert!(users[0]["passwordHash"].as_str().unwrap().starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_unreadable_documents_are_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let users_path = dir.path().join("cafe_spot_users.json");
    let cafes_path = dir.path().join("cafe_spot_cafes.json");
    std::fs::write(&users_path, "{not json").unwrap();
    std::fs::write(&cafes_path, "[{\"id\": 1}]").unwrap();
    std::fs::write(dir.path().join("cafe_spot_session.json"), "\"oops\"").unwrap();

    let ctx = file_context(dir.path()).await;

    let users: Vec<User> = ctx.store().read_users().await.unwrap();
    let cafes: Vec<Cafe> = ctx.store().read_cafes().await.unwrap();
    assert!(users.is_empty());
    assert!(cafes.is_empty());
    assert_eq!(ctx.auth().current().await.unwrap(), None);

    assert_eq!(std::fs::read_to_string(&users_path).unwrap(), "{not json");
    assert_eq!(std::fs::read_to_string(&cafes_path).unwrap(), "[{\"id\": 1}]");
}

#[tokio::test]
async fn test_legacy_user_accounts_survive_and_can_log_in() {
    let dir = tempfile::tempdir().unwrap();
    let legacy_users = r#"[
        {"id": "1712000000000a1b2", "name": "Admin Cafespot", "email": "admin@cafespot.com", "password": "123456", "type": "Admin"},
        {"id": "1712000000001c3d4", "name": "Ana", "email": "Ana@x.com", "password": "abcd", "type": "Cliente"}
    ]"#;
    std::fs::write(dir.path().join("cafe_spot_users.json"), legacy_users).unwrap();

    let ctx = file_context(dir.path()).await;

    let users = ctx.store().read_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].email.as_str(), "ana@x.com");
    assert_eq!(users[1].user_type, UserType::Client);
    assert!(users.iter().all(|u| u.password_hash.starts_with("$argon2id$")));

    let ana = ctx
        .auth()
        .login("ana@x.com", &SecretString::from("abcd"))
        .await
        .unwrap();
    assert_eq!(ana.id.as_str(), "1712000000001c3d4");
    assert!(!ana.is_admin());

    let admin = ctx
        .auth()
        .login("admin@cafespot.com", &SecretString::from("123456"))
        .await
        .unwrap();
    assert!(admin.is_admin());

    let raw = std::fs::read_to_string(dir.path().join("cafe_spot_users.json")).unwrap();
    assert!(!raw.contains("abcd"));
}

#[tokio::test]
async fn test_legacy_documents_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let legacy_cafes = r#"[{
        "id": "1712000000000",
        "name": "Velho Cafe",
        "address": {"street": "Rua B", "number": "2", "zip": "01310-100", "neighborhood": "Centro", "city": "Sao Paulo", "state": "SP"},
        "location": {"latitude": "-23.5", "longitude": "-46.6"},
        "cnpj": "98.765.432/0001-01",
        "averageTicket": "R$ 15"
    }]"#;
    std::fs::write(dir.path().join("cafe_spot_cafes.json"), legacy_cafes).unwrap();

    let ctx = file_context(dir.path()).await;
    let cafes = ctx.cafes().list().await.unwrap();

    assert_eq!(cafes.len(), 1);
    assert_eq!(cafes[0].id.as_str(), "1712000000000");
    assert!(cafes[0].active);
    assert!(cafes[0].liked_by.is_empty());
}

#[tokio::test]
async fn test_store_reports_its_directory() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = file_context(dir.path()).await;
    let backend: &FileStore = ctx.store().backend();
    assert_eq!(backend.dir(), dir.path());
}
