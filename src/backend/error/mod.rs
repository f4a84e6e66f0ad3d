//! Backend Error Module
//!
//! This module defines the error type returned by the flows and HTTP
//! handlers, and its conversion into JSON responses.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError` and its status/message mapping
//! - **`conversion`** - `IntoResponse` implementation
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Classification Flow
//!
//! Store clients classify backend answers into `StoreError`; flows decide
//! what a class means in context (a duplicate during registration becomes
//! `AccountExists`, a denial during room creation becomes `NotAllowed`) and
//! everything else converts into a passthrough `BackendError`.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
