//! Shared Module
//!
//! This module contains types that are shared between the server and any
//! client of its HTTP API. None of them depend on the `ssr` feature.
//!
//! # Overview
//!
//! - **`record`** - Backend records as passed through to clients
//! - **`message`** - Chat message payload stored in the `messages` collection
//! - **`config`** - Environment-driven application configuration

/// Backend record type
pub mod record;

/// Chat message payload
pub mod message;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use record::Record;
pub use message::Message;
pub use config::{AppConfig, AppConfigBuilder, AdminCredentials, AuthBackend, CorsOrigins, ConfigError};
