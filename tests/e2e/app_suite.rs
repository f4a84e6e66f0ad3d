//! E2E test suite for pbchat
//!
//! The client's identity-first login screen: probe the identity, then
//! register or log in, then open a room.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::test_app;

#[tokio::test]
async fn test_new_user_journey() {
    let app = test_app(true);
    let server = &app.server;

    let probe = server
        .post("/preLogin")
        .json(&json!({ "identity": "alice@example.com" }))
        .await;
    assert_eq!(probe.json::<Value>(), json!({ "exists": false }));

    let registered = server
        .post("/register")
        .json(&json!({
            "email": "alice@example.com",
            "password": "password123",
            "passwordConfirm": "password123",
            "username": "Alice"
        }))
        .await;
    registered.assert_status(StatusCode::CREATED);
    let registered: Value = registered.json();
    assert_eq!(registered["user"]["username"], "Alice");

    let login = server
        .post("/login")
        .json(&json!({ "identity": "Alice", "password": "password123" }))
        .await;
    login.assert_status_ok();
    let session: Value = login.json();
    assert_eq!(session["user"]["id"], registered["user"]["id"]);
    assert_ne!(session["token"], registered["token"]);

    let probe = server
        .post("/preLogin")
        .json(&json!({ "identity": "Alice" }))
        .await;
    assert_eq!(probe.json::<Value>(), json!({ "exists": true }));

    let token = session["token"].as_str().unwrap_or_default().to_string();
    let logout = server
        .post("/logout")
        .authorization_bearer(token)
        .await;
    assert_eq!(logout.json::<Value>(), json!({ "success": true }));
}

#[tokio::test]
async fn test_room_journey() {
    let app = test_app(true);
    let server = &app.server;

    let first = server
        .post("/createRoom")
        .json(&json!({ "title": "general" }))
        .await;
    first.assert_status(StatusCode::CREATED);
    let first: Value = first.json();
    assert_eq!(first["created"], true);
    assert_eq!(first["room"]["title"], "general");

    let second = server
        .post("/createRoom")
        .json(&json!({ "title": "  general  " }))
        .await;
    second.assert_status_ok();
    let second: Value = second.json();
    assert_eq!(second["created"], false);
    assert_eq!(second["room"]["id"], first["room"]["id"]);
}
