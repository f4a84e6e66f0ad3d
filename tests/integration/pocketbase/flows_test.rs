//! Flow tests against a mock PocketBase
//!
//! Anonymous requests carry no `Authorization` header; elevated ones carry
//! the superuser token. Mocks for the elevated variant are mounted with a
//! higher priority so they win when the header matches.

use std::sync::Arc;

use axum::http::StatusCode;
use pbchat::backend::auth::elevation::ElevatedSessionCache;
use pbchat::backend::auth::handlers::RegisterRequest;
use pbchat::backend::auth::prober::identity_exists;
use pbchat::backend::auth::register::register;
use pbchat::backend::error::BackendError;
use pbchat::backend::rooms::resolve_room;
use pbchat::backend::store::PocketBaseStore;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    admin_credentials, error_body, list_body, pocketbase_store, records, superuser_auth,
};

const ADMIN_TOKEN: &str = "admin-token";

async fn mount_superuser(server: &MockServer) {
    superuser_auth(ResponseTemplate::new(200).set_body_json(json!({
        "token": ADMIN_TOKEN,
        "record": { "id": "s1", "email": "root@example.com" }
    })))
    .mount(server)
    .await;
}

fn elevated_records(http_method: &str, collection: &str, template: ResponseTemplate) -> Mock {
    Mock::given(method(http_method))
        .and(path(format!("/api/collections/{collection}/records")))
        .and(header("Authorization", ADMIN_TOKEN))
        .respond_with(template)
        .with_priority(1)
}

fn setup(server: &MockServer, elevated: bool) -> (Arc<PocketBaseStore>, ElevatedSessionCache) {
    let store = pocketbase_store(server);
    let cache = ElevatedSessionCache::new(store.clone(), elevated.then(admin_credentials));
    (store, cache)
}

#[tokio::test]
async fn test_probe_escalates_on_hidden_field_rejection() {
    let server = MockServer::start().await;
    mount_superuser(&server).await;
    // Anonymous filters on hidden fields are rejected with 400
    records(
        "GET",
        "users",
        ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "Something went wrong while processing your request.",
            json!({}),
        )),
    )
    .with_priority(5)
    .mount(&server)
    .await;
    elevated_records(
        "GET",
        "users",
        ResponseTemplate::new(200).set_body_json(list_body(vec![json!({ "id": "u1" })])),
    )
    .mount(&server)
    .await;

    let (store, cache) = setup(&server, true);
    assert!(identity_exists(store.as_ref(), &cache, "alice@example.com").await.unwrap());
}

#[tokio::test]
async fn test_probe_list_rejection_with_uniqueness_wording_still_escalates() {
    let server = MockServer::start().await;
    mount_superuser(&server).await;
    records(
        "GET",
        "users",
        ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "Invalid filter: the unique field is already taken.",
            json!({}),
        )),
    )
    .with_priority(5)
    .mount(&server)
    .await;
    elevated_records(
        "GET",
        "users",
        ResponseTemplate::new(200).set_body_json(list_body(vec![json!({ "id": "u1" })])),
    )
    .mount(&server)
    .await;

    let (store, cache) = setup(&server, true);
    assert!(identity_exists(store.as_ref(), &cache, "alice@example.com").await.unwrap());
    assert_eq!(cache.authentication_count(), 1);
}

#[tokio::test]
async fn test_elevated_room_lookup_sends_backslashes_verbatim() {
    let server = MockServer::start().await;
    mount_superuser(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/collections/rooms/records"))
        .and(header("Authorization", ADMIN_TOKEN))
        .and(query_param("filter", r#"title = "lobby\one""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
            json!({ "id": "r9", "title": r"lobby\one" }),
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let (store, cache) = setup(&server, true);
    for _ in 0..2 {
        let resolution = resolve_room(store.as_ref(), &cache, r"lobby\one").await.unwrap();
        assert!(!resolution.created);
        assert_eq!(resolution.room.id, "r9");
    }
}

#[tokio::test]
async fn test_username_probe_checks_two_candidates() {
    let server = MockServer::start().await;
    records("GET", "users", ResponseTemplate::new(200).set_body_json(list_body(vec![])))
        .expect(2)
        .mount(&server)
        .await;

    let (store, cache) = setup(&server, false);
    assert!(!identity_exists(store.as_ref(), &cache, "alice").await.unwrap());
}

#[tokio::test]
async fn test_probe_unexpected_failure_is_500() {
    let server = MockServer::start().await;
    records(
        "GET",
        "users",
        ResponseTemplate::new(500).set_body_json(error_body(500, "boom", json!({}))),
    )
    .mount(&server)
    .await;

    let (store, cache) = setup(&server, true);
    let err = identity_exists(store.as_ref(), &cache, "alice@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(cache.authentication_count(), 0);
}

#[tokio::test]
async fn test_elevated_duplicate_registration_is_conflict() {
    let server = MockServer::start().await;
    mount_superuser(&server).await;
    records(
        "POST",
        "users",
        ResponseTemplate::new(403).set_body_json(error_body(
            403,
            "Only superusers can perform this action.",
            json!({}),
        )),
    )
    .with_priority(5)
    .mount(&server)
    .await;
    elevated_records(
        "POST",
        "users",
        ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "Failed to create record.",
            json!({ "email": { "code": "validation_not_unique", "message": "Value must be unique." } }),
        )),
    )
    .mount(&server)
    .await;

    let (store, cache) = setup(&server, true);
    let request = RegisterRequest {
        email: Some("alice@example.com".to_string()),
        password: Some("password123".to_string()),
        password_confirm: Some("password123".to_string()),
        username: None,
    };
    let err = register(store.as_ref(), &cache, &request).await.unwrap_err();
    assert_eq!(err, BackendError::AccountExists);
}

#[tokio::test]
async fn test_anonymous_duplicate_room_falls_back_to_lookup() {
    let server = MockServer::start().await;
    records(
        "POST",
        "rooms",
        ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "Failed to create record.",
            json!({ "title": { "code": "validation_not_unique", "message": "Value must be unique." } }),
        )),
    )
    .mount(&server)
    .await;
    records(
        "GET",
        "rooms",
        ResponseTemplate::new(200).set_body_json(list_body(vec![
            json!({ "id": "r1", "title": "general" }),
        ])),
    )
    .mount(&server)
    .await;

    let (store, cache) = setup(&server, false);
    let resolution = resolve_room(store.as_ref(), &cache, "general").await.unwrap();
    assert!(!resolution.created);
    assert_eq!(resolution.room.id, "r1");
}

#[tokio::test]
async fn test_anonymous_room_lookup_failure_surfaces_its_status() {
    let server = MockServer::start().await;
    records(
        "POST",
        "rooms",
        ResponseTemplate::new(400).set_body_json(error_body(400, "Failed to create record.", json!({}))),
    )
    .mount(&server)
    .await;
    records("GET", "rooms", ResponseTemplate::new(200).set_body_json(list_body(vec![])))
        .mount(&server)
        .await;

    let (store, cache) = setup(&server, false);
    let err = resolve_room(store.as_ref(), &cache, "general").await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_elevated_room_lookup_error_is_surfaced() {
    let server = MockServer::start().await;
    mount_superuser(&server).await;
    elevated_records(
        "GET",
        "rooms",
        ResponseTemplate::new(503).set_body_json(error_body(503, "maintenance", json!({}))),
    )
    .mount(&server)
    .await;

    let (store, cache) = setup(&server, true);
    let err = resolve_room(store.as_ref(), &cache, "general").await.unwrap_err();
    assert_eq!(err, BackendError::upstream(503, "maintenance"));
}
