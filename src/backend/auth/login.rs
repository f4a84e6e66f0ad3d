/**
 * Login and Logout Flows
 *
 * Login exchanges an identity (email or username) and password for a
 * session through the backend's `users` collection. There is no fallback:
 * a rejected exchange is an authentication failure.
 *
 * Logout is stateless. Backends that keep a live-token list drop the
 * presented token; all others have nothing to do.
 */

use super::handlers::types::LoginRequest;
use crate::backend::error::BackendError;
use crate::backend::store::{collections, AuthSession, RecordStore};

const REQUIRED: &str = "identity and password are required";

/// Log in with an identity and password
///
/// # Errors
/// * `MissingFields` - identity or password absent or empty
/// * `AuthFailed` - the backend rejected the exchange (its status, or 401)
pub async fn login(
    store: &dyn RecordStore,
    request: &LoginRequest,
) -> Result<AuthSession, BackendError> {
    let identity = request.identity.as_deref().map(str::trim).unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();
    if identity.is_empty() || password.is_empty() {
        return Err(BackendError::missing_fields(REQUIRED));
    }

    tracing::debug!("login: password exchange");
    store
        .auth_with_password(collections::USERS, identity, password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "login: authentication failed");
            BackendError::auth_failed(&e)
        })
}

/// Log out
///
/// # Returns
/// Whether a live token was revoked
pub async fn logout(store: &dyn RecordStore, token: Option<&str>) -> bool {
    match token {
        Some(token) => {
            let revoked = store.revoke_token(token).await;
            tracing::debug!(revoked, "logout");
            revoked
        }
        None => false,
    }
}
