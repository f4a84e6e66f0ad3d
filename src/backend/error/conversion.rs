/**
 * Error Conversion
 *
 * This module converts backend errors into HTTP responses so handlers can
 * return `Result<_, BackendError>` directly.
 *
 * # Response Format
 *
 * ```json
 * { "error": "Error message" }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    /// Convert a backend error into a JSON response with the mapped status
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = serde_json::json!({ "error": self.message() });
        (status, Json(body)).into_response()
    }
}
