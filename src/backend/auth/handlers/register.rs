/**
 * Registration Handler
 *
 * POST /register. Creates the account (falling back to elevated creation
 * when open registration is disabled) and returns the first session.
 */
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::register as flow;
use crate::backend::error::BackendError;
use crate::backend::middleware::LenientJson;
use crate::backend::server::state::AppState;

/// Registration handler
///
/// # Returns
///
/// `201 Created` with `{user, token}`
///
/// # Errors
///
/// * `400 Bad Request` - missing fields or password mismatch
/// * `409 Conflict` - the account already exists
/// * `503 Service Unavailable` - restricted registration and no elevated session
/// * backend status - any other backend failure
pub async fn register(
    State(state): State<AppState>,
    LenientJson(request): LenientJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let session = flow::register(state.store.as_ref(), &state.elevation, &request).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: session.record,
            token: session.token,
        }),
    ))
}
