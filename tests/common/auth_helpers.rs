//! Authentication test helpers
//!
//! Builds applications over the in-memory store and drives the auth routes.

use std::sync::Arc;

use axum_test::TestServer;
use pbchat::backend::server::{app_from_state, AppState};
use pbchat::backend::store::{collections, Access, CollectionRules, MemoryStore, RecordStore};
use pbchat::shared::{AdminCredentials, CorsOrigins};
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "root@example.com";
pub const ADMIN_PASSWORD: &str = "rootpassword";
pub const TEST_SECRET: &str = "integration-test-secret";

/// Elevated credentials matching the seeded superuser
pub fn admin_credentials() -> AdminCredentials {
    AdminCredentials {
        email: ADMIN_EMAIL.to_string(),
        password: ADMIN_PASSWORD.to_string(),
    }
}

/// Memory store with the test superuser and the cheapest bcrypt cost
pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(
        MemoryStore::new(TEST_SECRET)
            .with_bcrypt_cost(4)
            .with_superuser(ADMIN_EMAIL, ADMIN_PASSWORD),
    )
}

/// Application fixture: the server plus handles on its state
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

/// App over a fresh memory store; elevated credentials only when `elevated`
pub fn test_app(elevated: bool) -> TestApp {
    let store = memory_store();
    let state = AppState::new(store.clone(), elevated.then(admin_credentials));
    let server = TestServer::new(app_from_state(state.clone(), &CorsOrigins::Any))
        .expect("failed to start test server");
    TestApp {
        server,
        store,
        state,
    }
}

/// Close open registration: only superusers may create accounts
pub async fn restrict_registration(store: &MemoryStore) {
    let root = store
        .auth_with_password(collections::SUPERUSERS, ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("superuser login failed");
    store
        .update_collection_rules(
            collections::USERS,
            &CollectionRules::default(),
            Access::Token(&root.token),
        )
        .await
        .expect("failed to restrict registration");
}

/// Registration body with a matching confirmation
pub fn registration(email: &str, password: &str) -> Value {
    json!({
        "email": email,
        "password": password,
        "passwordConfirm": password,
    })
}

/// Register through the API, returning the response body
pub async fn register_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server.post("/register").json(&registration(email, password)).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}
