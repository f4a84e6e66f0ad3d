//! Elevated session cache tests against a mock PocketBase

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use futures_util::future::join_all;
use pbchat::backend::auth::elevation::{ElevatedSessionCache, ElevationError, ElevationState};
use pbchat::backend::store::{collections, Access, Filter, RecordStore, StoreError};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    admin_credentials, error_body, legacy_admin_auth, list_body, pocketbase_store, superuser_auth,
};

fn superuser_session(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "token": token,
        "record": { "id": "s1", "email": "root@example.com", "collectionName": "_superusers" }
    }))
}

async fn cache_for(server: &MockServer) -> Arc<ElevatedSessionCache> {
    let store = pocketbase_store(server);
    Arc::new(ElevatedSessionCache::new(store, Some(admin_credentials())))
}

#[tokio::test]
async fn test_concurrent_callers_authenticate_once() {
    let server = MockServer::start().await;
    superuser_auth(superuser_session("admin-token").set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server).await;
    let callers = (0..16).map(|_| {
        let cache = cache.clone();
        async move { cache.token().await }
    });
    let tokens = join_all(callers).await;

    assert!(tokens.iter().all(|t| t.as_deref() == Ok("admin-token")));
    assert_eq!(cache.authentication_count(), 1);
    assert_eq!(cache.state(), ElevationState::Authenticated);
}

#[tokio::test]
async fn test_falls_back_to_legacy_admin_route() {
    let server = MockServer::start().await;
    superuser_auth(ResponseTemplate::new(404).set_body_json(error_body(
        404,
        "Missing collection context.",
        json!({}),
    )))
    .expect(1)
    .mount(&server)
    .await;
    legacy_admin_auth(ResponseTemplate::new(200).set_body_json(json!({
        "token": "legacy-token",
        "admin": { "id": "a1", "email": "root@example.com" }
    })))
    .expect(1)
    .mount(&server)
    .await;

    let cache = cache_for(&server).await;
    assert_eq!(cache.token().await, Ok("legacy-token".to_string()));
    assert_eq!(cache.token().await, Ok("legacy-token".to_string()));
    assert_eq!(cache.authentication_count(), 1);
}

#[tokio::test]
async fn test_both_mechanisms_fail_with_last_error() {
    let server = MockServer::start().await;
    superuser_auth(ResponseTemplate::new(400).set_body_json(error_body(
        400,
        "Failed to authenticate.",
        json!({}),
    )))
    .mount(&server)
    .await;
    legacy_admin_auth(ResponseTemplate::new(404).set_body_json(error_body(
        404,
        "Not found.",
        json!({}),
    )))
    .mount(&server)
    .await;

    let cache = cache_for(&server).await;
    let err = cache.token().await.unwrap_err();
    assert_matches!(err, ElevationError::Failed(StoreError::NotFound { .. }));
    assert_eq!(cache.state(), ElevationState::Unauthenticated);
}

#[tokio::test]
async fn test_rejected_session_is_refreshed_once() {
    let server = MockServer::start().await;
    superuser_auth(superuser_session("stale-token"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    superuser_auth(superuser_session("fresh-token"))
        .with_priority(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/collections/users/records"))
        .and(header("Authorization", "stale-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body(
            401,
            "The request requires valid record authorization token.",
            json!({}),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/collections/users/records"))
        .and(header("Authorization", "fresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_body(vec![json!({ "id": "u1", "username": "alice" })])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = pocketbase_store(&server);
    let cache = ElevatedSessionCache::new(store.clone(), Some(admin_credentials()));
    let filter = Filter::eq("username", "alice");
    let record = cache
        .run(|token| {
            let store = store.clone();
            let filter = filter.clone();
            async move {
                store
                    .first_list_item(collections::USERS, &filter, Access::Token(&token))
                    .await
            }
        })
        .await
        .unwrap();

    assert_eq!(record.id, "u1");
    assert_eq!(cache.authentication_count(), 2);
}
