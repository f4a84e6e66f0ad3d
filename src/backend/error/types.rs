/**
 * Backend Error Types
 *
 * This module defines the errors the auth and room flows report to HTTP
 * clients. Each variant knows its status code and client-facing message.
 *
 * # Error Categories
 *
 * ## Input Errors (400)
 *
 * Raised before any backend call:
 * - Empty identity or title
 * - Missing required body fields
 * - Password and confirmation differ
 *
 * ## Outcome Errors
 *
 * - `AccountExists` (409) - backend reported a uniqueness failure
 * - `AuthFailed` (401 or the backend's status) - password exchange rejected
 * - `NotAllowed` (403) - anonymous room creation denied, no elevation
 * - `ElevationUnavailable` (503) - the elevated session could not be obtained
 *
 * ## Passthrough Errors
 *
 * Any other backend failure is surfaced with the backend's status and
 * message (`UpstreamUnexpected`); failures with no usable status become 500.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::elevation::ElevationError;
use crate::backend::auth::policy::StepError;
use crate::backend::store::StoreError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use pbchat::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::invalid_input("identity is required");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
///
/// let err = BackendError::upstream(502, "bad gateway");
/// assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// A single input value is unusable (empty identity, empty title)
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Required body fields are absent or the body is not JSON
    #[error("missing fields: {message}")]
    MissingFields { message: String },

    /// Password and confirmation differ
    #[error("password_mismatch")]
    PasswordMismatch,

    /// The account already exists
    #[error("user_exists")]
    AccountExists,

    /// Password exchange rejected
    ///
    /// Carries the backend's status when it supplied an error status.
    #[error("authentication failed: {message}")]
    AuthFailed {
        status: StatusCode,
        message: String,
    },

    /// Anonymous creation denied and no elevated fallback exists
    #[error("not_allowed")]
    NotAllowed,

    /// Elevated session could not be obtained
    #[error("elevation unavailable: {message}")]
    ElevationUnavailable { message: String },

    /// Any other backend failure, surfaced verbatim
    #[error("backend error ({status}): {message}")]
    UpstreamUnexpected { status: u16, message: String },

    /// Internal failure with no backend status
    #[error("server error: {message}")]
    ServerError { message: String },
}

impl BackendError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn missing_fields(message: impl Into<String>) -> Self {
        Self::MissingFields {
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::ServerError {
            message: message.into(),
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamUnexpected {
            status,
            message: message.into(),
        }
    }

    /// Authentication failure from a backend error
    ///
    /// The backend's status is passed through when it is an error status,
    /// otherwise 401.
    pub fn auth_failed(error: &StoreError) -> Self {
        let status = error
            .status()
            .and_then(|s| StatusCode::from_u16(s).ok())
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::UNAUTHORIZED);
        Self::AuthFailed {
            status,
            message: error.message().to_string(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `InvalidInput`, `MissingFields`, `PasswordMismatch` - 400 Bad Request
    /// - `AccountExists` - 409 Conflict
    /// - `AuthFailed` - the carried status
    /// - `NotAllowed` - 403 Forbidden
    /// - `ElevationUnavailable` - 503 Service Unavailable
    /// - `UpstreamUnexpected` - the backend's status, 500 if it is not an error status
    /// - `ServerError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } | Self::MissingFields { .. } | Self::PasswordMismatch => {
                StatusCode::BAD_REQUEST
            }
            Self::AccountExists => StatusCode::CONFLICT,
            Self::AuthFailed { status, .. } => *status,
            Self::NotAllowed => StatusCode::FORBIDDEN,
            Self::ElevationUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamUnexpected { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::ServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput { message }
            | Self::MissingFields { message }
            | Self::AuthFailed { message, .. }
            | Self::ElevationUnavailable { message }
            | Self::UpstreamUnexpected { message, .. }
            | Self::ServerError { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for BackendError {
    fn from(error: StoreError) -> Self {
        match error.status() {
            Some(status) => Self::UpstreamUnexpected {
                status,
                message: error.message().to_string(),
            },
            None => Self::ServerError {
                message: error.message().to_string(),
            },
        }
    }
}

impl From<ElevationError> for BackendError {
    fn from(error: ElevationError) -> Self {
        Self::ElevationUnavailable {
            message: error.to_string(),
        }
    }
}

impl From<StepError> for BackendError {
    fn from(error: StepError) -> Self {
        match error {
            StepError::Store(e) => e.into(),
            StepError::Elevation(e) => e.into(),
        }
    }
}
