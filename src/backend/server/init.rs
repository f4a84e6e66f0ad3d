/**
 * Server Initialization
 *
 * This module assembles the application from configuration: build the
 * record store, wrap it in `AppState` with the elevated session cache, and
 * hand the state to the router.
 *
 * # Initialization Process
 *
 * 1. Validate configuration and build the selected store
 * 2. Create the elevated session cache (authenticated lazily on first use)
 * 3. Create and configure the router
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{build_store, StartupError};
use crate::backend::server::state::AppState;
use crate::shared::{AppConfig, CorsOrigins};

/// Create the Axum application from configuration
///
/// # Errors
/// Returns `StartupError` if the configuration is invalid or the backend
/// client cannot be built.
pub fn create_app(config: &AppConfig) -> Result<Router<()>, StartupError> {
    tracing::info!(
        backend = ?config.backend,
        admin_configured = config.has_admin(),
        timeout_secs = config.request_timeout.as_secs(),
        "Initializing pbchat server"
    );

    let setup = build_store(config)?;
    let state = AppState::new(setup.store, setup.admin);
    Ok(app_from_state(state, &config.cors_origins))
}

/// Create the Axum application around an existing state
pub fn app_from_state(state: AppState, cors: &CorsOrigins) -> Router<()> {
    tracing::info!(
        store = state.store.name(),
        elevation = state.elevation.is_configured(),
        "Router configured"
    );
    create_router(state, cors)
}
