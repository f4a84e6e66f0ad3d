/**
 * Pre-Login Handler
 *
 * POST /preLogin. Lets the client choose between the login and the
 * registration form before asking for a password.
 */
use axum::extract::State;
use axum::response::Json;

use crate::backend::auth::handlers::types::{PreLoginRequest, PreLoginResponse};
use crate::backend::auth::prober::identity_exists;
use crate::backend::error::BackendError;
use crate::backend::middleware::LenientJson;
use crate::backend::server::state::AppState;

/// Pre-login handler
///
/// # Errors
///
/// * `400 Bad Request` - identity missing or blank
/// * `500 Internal Server Error` - unexpected anonymous lookup failure
///
/// # Example Request
///
/// ```http
/// POST /preLogin HTTP/1.1
/// Content-Type: application/json
///
/// { "identity": "alice@example.com" }
/// ```
///
/// # Example Response
///
/// ```json
/// { "exists": false }
/// ```
pub async fn pre_login(
    State(state): State<AppState>,
    LenientJson(request): LenientJson<PreLoginRequest>,
) -> Result<Json<PreLoginResponse>, BackendError> {
    let identity = request.identity.unwrap_or_default();
    let exists = identity_exists(state.store.as_ref(), &state.elevation, &identity).await?;
    Ok(Json(PreLoginResponse { exists }))
}
