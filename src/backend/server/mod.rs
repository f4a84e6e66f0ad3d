//! Server Module
//!
//! This module contains the code that turns configuration into a running
//! Axum application.
//!
//! # Architecture
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - Record store selection and startup errors
//! - **`init`** - Application assembly
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Store selection (PocketBase or memory)
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: `AppConfig::from_env` (done by the binary)
//! 2. **Store Selection**: exactly one `RecordStore` per process
//! 3. **State Creation**: store plus the shared elevated session cache
//! 4. **Router Creation**: routes, CORS and request tracing
//!
//! # Example
//!
//! ```rust,no_run
//! use pbchat::backend::server::create_app;
//! use pbchat::shared::AppConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(&config)?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Store selection
pub mod config;

/// Server initialization
pub mod init;

pub use config::{build_store, StartupError, StoreSetup};
pub use init::{app_from_state, create_app};
pub use state::AppState;
