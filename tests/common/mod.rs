//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - In-memory application fixtures (`TestServer` over `MemoryStore`)
//! - wiremock helpers for the PocketBase REST API
//! - Custom assertion macros

pub mod assertions;
#[cfg(feature = "ssr")]
pub mod auth_helpers;
#[cfg(feature = "ssr")]
pub mod mock_server;

#[cfg(feature = "ssr")]
pub use auth_helpers::*;
#[cfg(feature = "ssr")]
pub use mock_server::*;
