/**
 * Store Selection
 *
 * Turns the validated `AppConfig` into the record store the server runs
 * against. Exactly one store is built.
 *
 * # Memory Backend
 *
 * The memory store seeds a superuser from the configured admin credentials.
 * Without configured credentials an ephemeral superuser is generated for the
 * lifetime of the process, so elevated fallbacks (existence probing, room
 * creation) work out of the box in local development.
 */

use std::sync::Arc;

use thiserror::Error;

use crate::backend::store::{MemoryStore, PocketBaseStore, RecordStore};
use crate::shared::{AdminCredentials, AppConfig, AuthBackend, ConfigError};

const EPHEMERAL_ADMIN_EMAIL: &str = "admin@pbchat.local";

/// Errors that prevent the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to bind listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Selected store plus the elevated credentials to use with it
pub struct StoreSetup {
    pub store: Arc<dyn RecordStore>,
    pub admin: Option<AdminCredentials>,
}

/// Build the record store named by `config.backend`
///
/// # Errors
/// * `Config` - the configuration does not validate
/// * `HttpClient` - the PocketBase HTTP client could not be built
pub fn build_store(config: &AppConfig) -> Result<StoreSetup, StartupError> {
    config.validate()?;

    match config.backend {
        AuthBackend::PocketBase => {
            let base = config
                .pocketbase_url
                .clone()
                .ok_or(ConfigError::MissingValue("POCKETBASE_URL"))?;
            tracing::info!(url = %base, "Using PocketBase record store");
            let store = PocketBaseStore::new(base, config.request_timeout)?;
            Ok(StoreSetup {
                store: Arc::new(store),
                admin: config.admin.clone(),
            })
        }
        AuthBackend::Memory => {
            let admin = config.admin.clone().unwrap_or_else(|| {
                tracing::info!(
                    email = EPHEMERAL_ADMIN_EMAIL,
                    "No admin credentials configured, generated an ephemeral superuser"
                );
                ephemeral_admin()
            });
            tracing::warn!("Using in-memory record store; all accounts are lost on restart");
            let store = MemoryStore::new(config.jwt_secret.clone())
                .with_superuser(&admin.email, &admin.password);
            Ok(StoreSetup {
                store: Arc::new(store),
                admin: Some(admin),
            })
        }
    }
}

fn ephemeral_admin() -> AdminCredentials {
    AdminCredentials {
        email: EPHEMERAL_ADMIN_EMAIL.to_string(),
        password: uuid::Uuid::new_v4().simple().to_string(),
    }
}
