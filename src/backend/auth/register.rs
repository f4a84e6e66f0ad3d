/**
 * Registration Flow
 *
 * Creates an account and logs it in.
 *
 * # Process
 *
 * 1. Validate: `email`, `password`, `passwordConfirm` present, password
 *    matches its confirmation. Nothing reaches the backend otherwise.
 * 2. Anonymous create (open registration).
 * 3. Denied - elevated create (restricted registration).
 * 4. Duplicate on either path - `AccountExists`.
 * 5. Log in with the submitted credentials.
 */

use serde_json::json;

use super::elevation::ElevatedSessionCache;
use super::handlers::types::RegisterRequest;
use super::policy::{ChainFailure, ErrorClass, Policy, Privilege, StepError};
use crate::backend::error::BackendError;
use crate::backend::store::{collections, Access, AuthSession, RecordStore};
use crate::shared::Record;

const REQUIRED: &str = "email, password, passwordConfirm are required";

/// Registration strategy chain
pub fn register_policy() -> Policy<Privilege> {
    Policy::new(Privilege::Anonymous).then(&[ErrorClass::Forbidden], Privilege::Elevated)
}

/// Validated registration input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub username: String,
}

impl NewAccount {
    /// Validate a registration request
    ///
    /// # Errors
    /// * `MissingFields` - email, password or confirmation absent or empty
    /// * `PasswordMismatch` - password differs from its confirmation
    pub fn from_request(request: &RegisterRequest) -> Result<Self, BackendError> {
        let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        let (Some(email), Some(password), Some(confirm)) = (
            present(&request.email),
            present(&request.password),
            present(&request.password_confirm),
        ) else {
            return Err(BackendError::missing_fields(REQUIRED));
        };

        if password != confirm {
            return Err(BackendError::PasswordMismatch);
        }

        let username = display_name(request.username.as_deref(), &email);
        Ok(Self {
            email,
            password,
            username,
        })
    }

    fn body(&self) -> serde_json::Value {
        json!({
            "email": self.email,
            "username": self.username,
            "password": self.password,
            "passwordConfirm": self.password,
        })
    }
}

/// Trimmed username, or the email's local part when none was given
pub fn display_name(username: Option<&str>, email: &str) -> String {
    match username.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => email.split('@').next().unwrap_or(email).to_string(),
    }
}

/// Register an account and return its first session
///
/// # Errors
/// * `MissingFields` / `PasswordMismatch` - before any backend call
/// * `AccountExists` - the backend reported a uniqueness failure
/// * `ElevationUnavailable` - registration is restricted and elevation failed
/// * passthrough - any other backend failure
pub async fn register(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
    request: &RegisterRequest,
) -> Result<AuthSession, BackendError> {
    let account = NewAccount::from_request(request)?;
    let body = account.body();

    let outcome = register_policy()
        .run(|privilege| create_user(store, elevation, &body, privilege))
        .await;

    match outcome {
        Ok((privilege, record)) => {
            tracing::info!(?privilege, id = %record.id, "register: account created");
        }
        Err(ChainFailure { error, .. }) if error.class() == ErrorClass::Duplicate => {
            tracing::info!("register: account already exists");
            return Err(BackendError::AccountExists);
        }
        Err(ChainFailure {
            strategy, error, ..
        }) => {
            tracing::warn!(?strategy, error = %error, "register: create failed");
            return Err(error.into());
        }
    }

    tracing::debug!("register: auto-login");
    store
        .auth_with_password(collections::USERS, &account.email, &account.password)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "register: auto-login failed");
            BackendError::from(e)
        })
}

async fn create_user(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
    body: &serde_json::Value,
    privilege: Privilege,
) -> Result<Record, StepError> {
    match privilege {
        Privilege::Anonymous => Ok(store
            .create_record(collections::USERS, body, Access::Anonymous)
            .await?),
        Privilege::Elevated => {
            elevation
                .run(move |token| async move {
                    store
                        .create_record(collections::USERS, body, Access::Token(&token))
                        .await
                })
                .await
        }
    }
}
