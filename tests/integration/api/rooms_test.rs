//! Room API integration tests

use axum::http::{HeaderName, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::assert_error_body;
use crate::common::test_app;

#[tokio::test]
async fn test_create_room_requires_title() {
    let app = test_app(true);

    let response = app.server.post("/createRoom").json(&json!({})).await;
    assert_error_body!(response, StatusCode::BAD_REQUEST, "title is required");

    let response = app.server.post("/createRoom").json(&json!({ "title": 42 })).await;
    assert_error_body!(response, StatusCode::BAD_REQUEST, "title is required");
}

#[tokio::test]
async fn test_create_room_is_idempotent() {
    let app = test_app(true);

    let first = app
        .server
        .post("/createRoom")
        .json(&json!({ "title": "room-123" }))
        .await;
    first.assert_status(StatusCode::CREATED);
    let first: Value = first.json();
    assert_eq!(first["created"], true);
    assert_eq!(first["room"]["title"], "room-123");
    assert!(first["room"]["createdAtMs"].as_i64().is_some());

    let second = app
        .server
        .post("/createRoom")
        .json(&json!({ "title": "room-123" }))
        .await;
    second.assert_status_ok();
    let second: Value = second.json();
    assert_eq!(second["created"], false);
    assert_eq!(second["room"]["id"], first["room"]["id"]);
}

#[tokio::test]
async fn test_create_room_without_elevation_is_not_allowed() {
    let app = test_app(false);
    let response = app
        .server
        .post("/createRoom")
        .json(&json!({ "title": "general" }))
        .await;
    assert_error_body!(response, StatusCode::FORBIDDEN, "not_allowed");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = test_app(true);
    let response = app
        .server
        .post("/createRoom")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://localhost:5173"),
        )
        .json(&json!({ "title": "general" }))
        .await;
    assert_eq!(response.header("access-control-allow-origin"), "*");
}
