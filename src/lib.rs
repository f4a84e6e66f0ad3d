//! pbchat - Chat Auth Layer over PocketBase
//!
//! pbchat is a small HTTP service that sits between a chat client and a
//! PocketBase backend. It resolves identities, registers and logs in
//! accounts, and creates rooms, falling back to a privileged (superuser)
//! session where the backend's collection rules deny anonymous access.
//!
//! # Overview
//!
//! Persistence, filtering, realtime fan-out and token issuance all belong to
//! the backend. This crate only decides which strategy to try, in which
//! order, and how to classify what the backend answers.
//!
//! # Module Structure
//!
//! - **`shared`** - Types that do not depend on the server stack
//!   - Backend records, chat messages
//!   - Environment-driven configuration
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - `RecordStore` with PocketBase and in-memory implementations
//!   - Identity prober, registration, login, room resolver
//!   - Elevated session cache and fallback policy tables
//!   - Axum router and the provisioning tools
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend module and both binaries
//!
//! # Usage
//!
//! ```rust,no_run
//! use pbchat::backend::server::init::create_app;
//! use pbchat::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(&config)?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.api_port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Binaries
//!
//! - `pbchat-server` - the HTTP API
//! - `pbchat-provision` - schema bootstrap and message seeding
//!
//! # Error Handling
//!
//! - `backend::store::StoreError` - classified backend failures
//! - `backend::error::BackendError` - route-level errors rendered as `{ "error": ... }`
//! - `shared::ConfigError` - configuration problems found at startup

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
