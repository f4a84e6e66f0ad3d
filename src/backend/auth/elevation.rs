/**
 * Elevated Session Cache
 *
 * Process-wide privileged session used by flows that fall back to elevated
 * access. The session is authenticated lazily on first use and reused until
 * the backend invalidates it.
 *
 * # States
 *
 * ```text
 * Unauthenticated --token()--> Authenticating --ok--> Authenticated
 *        ^                          |                      |
 *        +----------- failure ------+    expiry / 401 -----+
 * ```
 *
 * # Single-Flight
 *
 * A double-checked read of the cached token keeps the hot path lock-free.
 * Callers that miss queue on the `flight` mutex; the first one in
 * authenticates, the others observe its outcome (token or error) without
 * issuing another password exchange.
 */
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use super::policy::StepError;
use super::sessions::token_expired;
use crate::backend::store::{collections, RecordStore, StoreError};
use crate::shared::AdminCredentials;

/// Failure to obtain the elevated session
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ElevationError {
    /// No privileged identity/secret configured
    #[error("elevated access is not configured")]
    Unavailable,
    /// Both authentication mechanisms failed; carries the last error
    #[error("elevated authentication failed: {0}")]
    Failed(StoreError),
}

/// Observable cache state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Shared privileged session
pub struct ElevatedSessionCache {
    store: Arc<dyn RecordStore>,
    credentials: Option<AdminCredentials>,
    session: RwLock<Option<String>>,
    /// Serializes authentication; holds the last failure for queued callers
    flight: Mutex<Option<ElevationError>>,
    authenticating: AtomicBool,
    authentications: AtomicUsize,
}

impl std::fmt::Debug for ElevatedSessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevatedSessionCache")
            .field("store", &self.store.name())
            .field("configured", &self.is_configured())
            .field("state", &self.state())
            .finish()
    }
}

impl ElevatedSessionCache {
    pub fn new(store: Arc<dyn RecordStore>, credentials: Option<AdminCredentials>) -> Self {
        Self {
            store,
            credentials,
            session: RwLock::new(None),
            flight: Mutex::new(None),
            authenticating: AtomicBool::new(false),
            authentications: AtomicUsize::new(0),
        }
    }

    /// Whether privileged credentials are configured
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn state(&self) -> ElevationState {
        if self.authenticating.load(Ordering::SeqCst) {
            return ElevationState::Authenticating;
        }
        match self.session.try_read() {
            Ok(guard) if guard.is_some() => ElevationState::Authenticated,
            Ok(_) => ElevationState::Unauthenticated,
            Err(_) => ElevationState::Authenticating,
        }
    }

    /// Number of authentications performed so far
    pub fn authentication_count(&self) -> usize {
        self.authentications.load(Ordering::SeqCst)
    }

    /// Get the elevated token, authenticating if needed
    ///
    /// # Errors
    ///
    /// `Unavailable` without credentials, `Failed` when both the superuser
    /// and the legacy admin exchange fail.
    pub async fn token(&self) -> Result<String, ElevationError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ElevationError::Unavailable)?;

        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let seen = self.authentication_count();
        let mut last_failure = self.flight.lock().await;

        // Someone else held the flight while we waited
        if let Some(token) = self.cached().await {
            return Ok(token);
        }
        if self.authentication_count() != seen {
            if let Some(error) = last_failure.clone() {
                return Err(error);
            }
        }

        self.authenticating.store(true, Ordering::SeqCst);
        let result = self.authenticate(credentials).await;
        self.authenticating.store(false, Ordering::SeqCst);

        match result {
            Ok(token) => {
                *self.session.write().await = Some(token.clone());
                *last_failure = None;
                Ok(token)
            }
            Err(error) => {
                *last_failure = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Drop the cached session if it is still `token`
    pub async fn invalidate(&self, token: &str) {
        let mut session = self.session.write().await;
        if session.as_deref() == Some(token) {
            tracing::info!("Invalidating elevated session");
            *session = None;
        }
    }

    /// Run an elevated operation
    ///
    /// A 401 from the backend invalidates the session; the operation is
    /// retried once with a freshly authenticated token.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, StepError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let token = self.token().await?;
        match op(token.clone()).await {
            Err(error) if error.is_token_rejected() => {
                tracing::warn!("Elevated session rejected by backend, re-authenticating");
                self.invalidate(&token).await;
                let token = self.token().await?;
                Ok(op(token).await?)
            }
            other => Ok(other?),
        }
    }

    async fn cached(&self) -> Option<String> {
        let session = self.session.read().await;
        match session.as_deref() {
            Some(token) if !token_expired(token) => Some(token.to_string()),
            _ => None,
        }
    }

    async fn authenticate(&self, credentials: &AdminCredentials) -> Result<String, ElevationError> {
        self.authentications.fetch_add(1, Ordering::SeqCst);
        tracing::info!(store = self.store.name(), "Authenticating elevated session");

        match self
            .store
            .auth_with_password(
                collections::SUPERUSERS,
                &credentials.email,
                &credentials.password,
            )
            .await
        {
            Ok(session) => return Ok(session.token),
            Err(e) => {
                tracing::warn!(error = %e, "Superuser authentication failed, trying legacy admin route")
            }
        }

        self.store
            .legacy_admin_auth(&credentials.email, &credentials.password)
            .await
            .map(|session| session.token)
            .map_err(|e| {
                tracing::error!(error = %e, "Elevated authentication failed");
                ElevationError::Failed(e)
            })
    }
}
