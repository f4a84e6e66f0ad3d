//! Mock PocketBase helpers for integration tests
//!
//! Wraps a wiremock `MockServer` with the response shapes PocketBase uses,
//! and builds a `PocketBaseStore` pointed at it.

use std::sync::Arc;
use std::time::Duration;

use pbchat::backend::store::PocketBaseStore;
use reqwest::Url;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client for the mock server with a short timeout
pub fn pocketbase_store(server: &MockServer) -> Arc<PocketBaseStore> {
    let base = Url::parse(&server.uri()).expect("mock server URI");
    Arc::new(PocketBaseStore::new(base, Duration::from_secs(5)).expect("reqwest client"))
}

/// PocketBase error body
pub fn error_body(status: u16, message: &str, data: Value) -> Value {
    json!({ "status": status, "message": message, "data": data })
}

/// A single-item (or empty) list response
pub fn list_body(items: Vec<Value>) -> Value {
    json!({
        "page": 1,
        "perPage": 1,
        "totalItems": -1,
        "totalPages": -1,
        "items": items,
    })
}

/// Auth response for a password exchange
pub fn auth_body(token: &str, id: &str, email: &str) -> Value {
    json!({
        "token": token,
        "record": { "id": id, "email": email, "collectionName": "users" },
    })
}

/// `POST /api/collections/_superusers/auth-with-password` answering `template`
pub fn superuser_auth(template: ResponseTemplate) -> Mock {
    Mock::given(method("POST"))
        .and(path("/api/collections/_superusers/auth-with-password"))
        .respond_with(template)
}

/// `POST /api/admins/auth-with-password` answering `template`
pub fn legacy_admin_auth(template: ResponseTemplate) -> Mock {
    Mock::given(method("POST"))
        .and(path("/api/admins/auth-with-password"))
        .respond_with(template)
}

/// `{method} /api/collections/{collection}/records` answering `template`
pub fn records(http_method: &str, collection: &str, template: ResponseTemplate) -> Mock {
    Mock::given(method(http_method))
        .and(path(format!("/api/collections/{collection}/records")))
        .respond_with(template)
}
