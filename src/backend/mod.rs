//! Backend Module
//!
//! This module contains all server-side code: the record store clients, the
//! authentication and room flows, and the Axum HTTP layer that exposes them.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`store`** - `RecordStore` trait, PocketBase client, in-memory store
//! - **`auth`** - Identity prober, registration, login, elevated session
//! - **`rooms`** - Idempotent room resolution
//! - **`provision`** - Schema bootstrap and message seeding
//! - **`server`** - Store selection, application state, initialization
//! - **`routes`** - Route table, CORS and tracing layers
//! - **`middleware`** - Request extractors
//! - **`error`** - Backend error type and JSON error responses
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - pbchat-server binary
//! ├── store/          - Backend clients
//! ├── auth/           - Authentication flows and handlers
//! ├── rooms/          - Room resolver and handler
//! ├── provision/      - Schema and seed (plus the pbchat-provision binary)
//! ├── server/         - State and initialization
//! ├── routes/         - Route configuration
//! ├── middleware/     - Extractors
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` carries the selected `Arc<dyn RecordStore>` and the shared
//! `Arc<ElevatedSessionCache>`. The cache is the only mutable state the
//! server owns; everything else lives in the backend service.
//!
//! # Request Flow
//!
//! ```text
//! HTTP -> CORS -> TraceLayer -> handler -> flow (policy table)
//!                                            |-> RecordStore (anonymous)
//!                                            '-> ElevatedSessionCache -> RecordStore (elevated)
//! ```

/// Backend record store clients
pub mod store;

/// Authentication flows and handlers
pub mod auth;

/// Room resolution
pub mod rooms;

/// Schema bootstrap and seeding
pub mod provision;

/// Server initialization and state
pub mod server;

/// HTTP route configuration
pub mod routes;

/// Request extractors
pub mod middleware;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::{create_app, AppState};
pub use store::{MemoryStore, PocketBaseStore, RecordStore, StoreError};
