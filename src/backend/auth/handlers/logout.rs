/**
 * Logout Handler
 *
 * POST /logout. Always succeeds; a presented bearer token is revoked on
 * backends that track live tokens.
 */
use axum::extract::State;
use axum::response::Json;

use crate::backend::auth::handlers::types::LogoutResponse;
use crate::backend::auth::login as flow;
use crate::backend::middleware::BearerToken;
use crate::backend::server::state::AppState;

/// Logout handler
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Json<LogoutResponse> {
    flow::logout(state.store.as_ref(), token.as_deref()).await;
    Json(LogoutResponse { success: true })
}
