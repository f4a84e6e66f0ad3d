//! Authentication Module
//!
//! This module implements the identity-resolution and admin-fallback flows:
//! existence probing, registration, login and logout, on top of a shared
//! elevated session.
//!
//! # Architecture
//!
//! - **`sessions`** - JWT claims, signing and expiry checks
//! - **`policy`** - Fallback policy tables (ordered strategies with
//!   per-step escalation classes)
//! - **`elevation`** - Process-wide elevated session, single-flight
//! - **`prober`** - Identity existence check
//! - **`register`** - Account creation with elevated fallback
//! - **`login`** - Password login and logout
//! - **`handlers`** - HTTP handlers for the auth routes
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── sessions.rs     - JWT token management
//! ├── policy.rs       - Fallback chains and error classes
//! ├── elevation.rs    - Elevated session cache
//! ├── prober.rs       - Identity prober
//! ├── register.rs     - Registration flow
//! ├── login.rs        - Login and logout flows
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── pre_login.rs
//!     ├── register.rs
//!     ├── login.rs
//!     └── logout.rs
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Pre-login**: identity → anonymous lookup → (denied) elevated lookup → exists?
//! 2. **Register**: validate → anonymous create → (denied) elevated create → login
//! 3. **Login**: identity + password → backend password exchange → token
//! 4. **Logout**: stateless; the dummy store revokes the presented token
//!
//! # Security
//!
//! - Passwords are only ever forwarded to the backend, never logged
//! - The elevated session never leaves the process
//! - Validation failures are reported before any backend call

/// JWT token generation and validation
pub mod sessions;

/// Fallback policy tables
pub mod policy;

/// Elevated session cache
pub mod elevation;

/// Identity prober
pub mod prober;

/// Registration flow
pub mod register;

/// Login and logout flows
pub mod login;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use elevation::{ElevatedSessionCache, ElevationError, ElevationState};
pub use handlers::types::{AuthResponse, LoginRequest, PreLoginRequest, RegisterRequest};
pub use policy::{ChainFailure, ErrorClass, Policy, Privilege, Step, StepError};
pub use prober::identity_exists;
