//! PocketBase REST client tests
//!
//! Request shapes and error classification against a mock server.

use std::time::Duration;

use assert_matches::assert_matches;
use pbchat::backend::store::{collections, Access, Filter, PocketBaseStore, RecordStore, StoreError};
use reqwest::Url;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{auth_body, error_body, list_body, pocketbase_store, records};

#[tokio::test]
async fn test_first_list_item_sends_filter_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/users/records"))
        .and(query_param("filter", r#"email = "a\"b@example.com""#))
        .and(query_param("perPage", "1"))
        .and(header("Authorization", "admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
            json!({ "id": "u1", "email": "a\"b@example.com" }),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = pocketbase_store(&server);
    let record = store
        .first_list_item(
            collections::USERS,
            &Filter::eq("email", "a\"b@example.com"),
            Access::Token("admin-token"),
        )
        .await
        .unwrap();
    assert_eq!(record.id, "u1");
}

#[tokio::test]
async fn test_empty_list_is_not_found() {
    let server = MockServer::start().await;
    records("GET", "rooms", ResponseTemplate::new(200).set_body_json(list_body(vec![])))
        .mount(&server)
        .await;

    let store = pocketbase_store(&server);
    let err = store
        .first_list_item(collections::ROOMS, &Filter::eq("title", "x"), Access::Anonymous)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::NotFound { .. });
}

#[tokio::test]
async fn test_error_classification() {
    let server = MockServer::start().await;
    let store = pocketbase_store(&server);
    let body = json!({ "email": "a@example.com" });

    let cases = vec![
        (
            ResponseTemplate::new(400).set_body_json(error_body(
                400,
                "Failed to create record.",
                json!({ "email": { "code": "validation_not_unique", "message": "Value must be unique." } }),
            )),
            StoreError::duplicate("email: Value must be unique."),
        ),
        (
            ResponseTemplate::new(400).set_body_json(error_body(
                400,
                "Failed to create record.",
                json!({ "password": { "code": "validation_length_out_of_range", "message": "Too short." } }),
            )),
            StoreError::invalid("Failed to create record."),
        ),
        (
            ResponseTemplate::new(403).set_body_json(error_body(
                403,
                "Only superusers can perform this action.",
                json!({}),
            )),
            StoreError::forbidden(403, "Only superusers can perform this action."),
        ),
        (
            ResponseTemplate::new(502),
            StoreError::Upstream {
                status: 502,
                message: "status 502".to_string(),
            },
        ),
    ];

    for (template, expected) in cases {
        server.reset().await;
        records("POST", "users", template).mount(&server).await;
        let err = store
            .create_record(collections::USERS, &body, Access::Anonymous)
            .await
            .unwrap_err();
        assert_eq!(err, expected);
    }
}

#[tokio::test]
async fn test_auth_with_password_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/users/auth-with-password"))
        .and(body_json(json!({ "identity": "alice", "password": "password123" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(auth_body("tok", "u1", "alice@example.com")),
        )
        .mount(&server)
        .await;

    let store = pocketbase_store(&server);
    let session = store
        .auth_with_password(collections::USERS, "alice", "password123")
        .await
        .unwrap();
    assert_eq!(session.token, "tok");
    assert_eq!(session.record.str_field("email"), Some("alice@example.com"));
}

#[tokio::test]
async fn test_legacy_admin_response_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admins/auth-with-password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "legacy-token",
            "admin": { "id": "a1", "email": "root@example.com" }
        })))
        .mount(&server)
        .await;

    let store = pocketbase_store(&server);
    let session = store
        .legacy_admin_auth("root@example.com", "rootpassword")
        .await
        .unwrap();
    assert_eq!(session.token, "legacy-token");
    assert_eq!(session.record.id, "a1");
}

#[tokio::test]
async fn test_find_collection_missing_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/rooms"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "The requested resource wasn't found.",
            json!({}),
        )))
        .mount(&server)
        .await;

    let store = pocketbase_store(&server);
    let found = store
        .find_collection("rooms", Access::Token("admin-token"))
        .await
        .unwrap();
    assert_eq!(found, None);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport() {
    // Nothing listens on port 1
    let store = PocketBaseStore::new(
        Url::parse("http://127.0.0.1:1").unwrap(),
        Duration::from_secs(2),
    )
    .unwrap();
    let err = store
        .first_list_item(collections::USERS, &Filter::eq("email", "a@b.c"), Access::Anonymous)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Transport { .. });
    assert_eq!(err.status(), None);
}
