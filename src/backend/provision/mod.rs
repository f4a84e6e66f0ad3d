//! Provisioning Module
//!
//! Elevated bootstrap of a backend for the chat: the `rooms` and `messages`
//! collections with their access rules, and a seeded demo room.
//!
//! # Architecture
//!
//! - **`schema`** - collection definitions and `ensure_schema`
//! - **`seed`** - seed file loading and message upserts
//!
//! Both run through the same `ElevatedSessionCache` the server uses, so a
//! single password exchange covers the whole run. The `pbchat-provision`
//! binary (`main.rs`) wires them to the command line.

/// Collection definitions and bootstrap
pub mod schema;

/// Message seeding
pub mod seed;

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::auth::elevation::ElevationError;
use crate::backend::auth::policy::StepError;
use crate::backend::error::BackendError;
use crate::backend::store::StoreError;
use crate::shared::ConfigError;

pub use schema::{ensure_schema, messages_schema, rooms_schema, Ensured, SchemaReport};
pub use seed::{load_seed_messages, seed_messages, SeedReport, DEFAULT_ROOM, DEFAULT_SEED_FILE};

/// Provisioning failures
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Elevation(#[from] ElevationError),

    #[error("backend error: {0}")]
    Store(#[from] StoreError),

    #[error("room resolution failed: {0}")]
    Room(#[from] BackendError),

    #[error("failed to read seed file {}: {source}", path.display())]
    SeedRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid seed file {}: {reason}", path.display())]
    SeedFormat { path: PathBuf, reason: String },
}

impl From<StepError> for ProvisionError {
    fn from(error: StepError) -> Self {
        match error {
            StepError::Store(e) => Self::Store(e),
            StepError::Elevation(e) => Self::Elevation(e),
        }
    }
}
