//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, CORS and tracing layers
//! - **`api_routes`** - The route table
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint table
//! ```
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /preLogin` | `auth::handlers::pre_login` |
//! | `POST /register` | `auth::handlers::register` |
//! | `POST /login` | `auth::handlers::login` |
//! | `POST /logout` | `auth::handlers::logout` |
//! | `POST /createRoom` | `rooms::handlers::create_room` |

/// Main router creation
pub mod router;

/// API endpoint table
pub mod api_routes;

pub use router::{cors_layer, create_router};
