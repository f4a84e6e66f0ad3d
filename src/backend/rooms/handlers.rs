/**
 * Room Handler
 *
 * POST /createRoom. Idempotent: the first call for a title creates the room
 * (201), later calls return the existing one (200).
 */
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::resolver::resolve_room;
use crate::backend::error::BackendError;
use crate::backend::middleware::LenientJson;
use crate::backend::server::state::AppState;
use crate::shared::Record;

/// Create-room request
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct CreateRoomRequest {
    pub title: Option<String>,
}

/// Create-room response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateRoomResponse {
    pub room: Record,
    /// Whether this call created the room
    pub created: bool,
}

/// Create-room handler
///
/// # Errors
///
/// * `400 Bad Request` - title missing or blank
/// * `403 Forbidden` - anonymous creation denied and no elevated credentials
/// * backend status - any other backend failure
pub async fn create_room(
    State(state): State<AppState>,
    LenientJson(request): LenientJson<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), BackendError> {
    let title = request.title.unwrap_or_default();
    let resolution = resolve_room(state.store.as_ref(), &state.elevation, &title).await?;

    let status = if resolution.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(CreateRoomResponse {
            room: resolution.room,
            created: resolution.created,
        }),
    ))
}
