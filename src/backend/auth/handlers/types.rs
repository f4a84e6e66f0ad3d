/**
 * Authentication Handler Types
 *
 * Request and response bodies of the auth routes. Request fields are all
 * optional so that absent or mistyped values surface as the route's own
 * validation error instead of a deserialization rejection.
 */

use serde::{Deserialize, Serialize};

use crate::shared::Record;

/// Pre-login request
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct PreLoginRequest {
    /// Email or username
    pub identity: Option<String>,
}

/// Pre-login response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PreLoginResponse {
    /// Whether an account matches the identity
    pub exists: bool,
}

/// Registration request
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
    /// Display name; defaults to the email's local part
    pub username: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct LoginRequest {
    /// Email or username
    pub identity: Option<String>,
    pub password: Option<String>,
}

/// Auth response
///
/// Returned by register and login: the backend's account record and the
/// session token the client keeps.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthResponse {
    pub user: Record,
    pub token: String,
}

/// Logout response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogoutResponse {
    pub success: bool,
}
