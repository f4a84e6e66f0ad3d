//! Middleware Module
//!
//! Request extractors shared by the route handlers.
//!
//! # Architecture
//!
//! - **`auth`** - optional bearer token from the `Authorization` header
//! - **`json`** - JSON body extractor that falls back to an empty request
//!
//! Neither extractor rejects a request; the handlers decide what absent
//! input means.

pub mod auth;
pub mod json;

pub use auth::{token_from_headers, BearerToken};
pub use json::LenientJson;
