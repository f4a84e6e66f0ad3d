//! Authentication Handlers Module
//!
//! This module contains the HTTP handlers for the authentication endpoints.
//! Each handler only extracts the request and shapes the response; the
//! flows themselves live one level up.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Request and response types
//! ├── pre_login.rs  - Identity existence check
//! ├── register.rs   - Account registration
//! ├── login.rs      - Password login
//! └── logout.rs     - Logout
//! ```
//!
//! # Handlers
//!
//! - **`pre_login`** - POST /preLogin - `{exists}`
//! - **`register`** - POST /register - 201 `{user, token}`
//! - **`login`** - POST /login - `{user, token}`
//! - **`logout`** - POST /logout - `{success: true}`
//!
//! # Authentication Flow
//!
//! 1. **Pre-login**: identity → does the account exist?
//! 2. **Register** (absent) or **Login** (present) → session token
//! 3. The client keeps the token and talks to the backend directly
//!
//! # Example
//!
//! ```rust,no_run
//! use pbchat::backend::auth::handlers::{login, logout, pre_login, register};
//! use pbchat::backend::server::AppState;
//! use axum::{routing::post, Router};
//!
//! let router: Router<AppState> = Router::new()
//!     .route("/preLogin", post(pre_login))
//!     .route("/register", post(register))
//!     .route("/login", post(login))
//!     .route("/logout", post(logout));
//! ```

/// Request and response types
pub mod types;

/// Pre-login handler
pub mod pre_login;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Logout handler
pub mod logout;

pub use types::{
    AuthResponse, LoginRequest, LogoutResponse, PreLoginRequest, PreLoginResponse,
    RegisterRequest,
};

pub use login::login;
pub use logout::logout;
pub use pre_login::pre_login;
pub use register::register;
