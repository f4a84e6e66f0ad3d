/**
 * Login Handler
 *
 * POST /login. Exchanges an identity (email or username) and password for a
 * session token.
 *
 * # Security
 *
 * - The password goes straight to the backend; it is never logged or stored
 * - The backend's rejection status is passed through (401 by default)
 */
use axum::extract::State;
use axum::response::Json;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::login as flow;
use crate::backend::error::BackendError;
use crate::backend::middleware::LenientJson;
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - identity or password missing
/// * `401 Unauthorized` - credentials rejected (or the backend's own status)
///
/// # Example Request
///
/// ```http
/// POST /login HTTP/1.1
/// Content-Type: application/json
///
/// { "identity": "alice", "password": "password123" }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "user": { "id": "k3x9...", "email": "alice@example.com", "username": "alice" },
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    LenientJson(request): LenientJson<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let session = flow::login(state.store.as_ref(), &request).await?;
    Ok(Json(AuthResponse {
        user: session.record,
        token: session.token,
    }))
}
