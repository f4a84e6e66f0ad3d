/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds the two process-wide resources every route needs:
 * - the selected record store, behind `Arc<dyn RecordStore>`
 * - the elevated session cache shared by all fallback flows
 *
 * Both are reference counted; cloning the state per request is cheap.
 *
 * # Example
 *
 * ```rust
 * use pbchat::backend::server::state::AppState;
 * use pbchat::backend::store::MemoryStore;
 * use std::sync::Arc;
 *
 * let state = AppState::new(Arc::new(MemoryStore::new("secret")), None);
 * assert!(!state.elevation.is_configured());
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::elevation::ElevatedSessionCache;
use crate::backend::store::RecordStore;
use crate::shared::AdminCredentials;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Backend client selected at startup
    pub store: Arc<dyn RecordStore>,
    /// Elevated session shared by every flow
    pub elevation: Arc<ElevatedSessionCache>,
}

impl AppState {
    /// Build the state around a store, with optional elevated credentials
    pub fn new(store: Arc<dyn RecordStore>, admin: Option<AdminCredentials>) -> Self {
        let elevation = Arc::new(ElevatedSessionCache::new(store.clone(), admin));
        Self { store, elevation }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.name())
            .field("elevation", &self.elevation)
            .finish()
    }
}

impl FromRef<AppState> for Arc<dyn RecordStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<ElevatedSessionCache> {
    fn from_ref(state: &AppState) -> Self {
        state.elevation.clone()
    }
}
