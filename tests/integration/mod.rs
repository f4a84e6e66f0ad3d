//! Integration tests
//!
//! - `api` - HTTP routes over the in-memory store (axum-test)
//! - `pocketbase` - REST client, elevated session and flows against wiremock
//! - `config_test` - configuration loaded from the process environment

pub mod api;
pub mod config_test;
