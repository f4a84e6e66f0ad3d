/**
 * Room Resolver
 *
 * Idempotent find-or-create of a room by title. The trimmed title is the
 * only lookup key.
 *
 * # Elevated (credentials configured)
 *
 * Lookup first; only a not-found lookup creates. Any other lookup failure is
 * surfaced with its status.
 *
 * # Anonymous
 *
 * Create first. A denial is final (`NotAllowed`); any other create failure
 * (typically a duplicate title) falls back to a lookup.
 */

use serde_json::json;

use crate::backend::auth::elevation::ElevatedSessionCache;
use crate::backend::auth::policy::{ChainFailure, ErrorClass, Policy, StepError};
use crate::backend::error::BackendError;
use crate::backend::store::{collections, Access, Filter, RecordStore, StoreError};
use crate::shared::message::now_ms;
use crate::shared::Record;

/// Create failures that fall back to a lookup on the anonymous path
const CREATE_FALLBACK: &[ErrorClass] = &[
    ErrorClass::NotFound,
    ErrorClass::Duplicate,
    ErrorClass::Invalid,
    ErrorClass::Upstream,
    ErrorClass::Transport,
];

/// Room resolver strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStep {
    Lookup,
    Create,
}

/// Chain used with elevated credentials
pub fn elevated_policy() -> Policy<RoomStep> {
    Policy::new(RoomStep::Lookup).then(&[ErrorClass::NotFound], RoomStep::Create)
}

/// Chain used without elevated credentials
pub fn anonymous_policy() -> Policy<RoomStep> {
    Policy::new(RoomStep::Create).then(CREATE_FALLBACK, RoomStep::Lookup)
}

/// A resolved room and whether this call created it
#[derive(Debug, Clone, PartialEq)]
pub struct RoomResolution {
    pub room: Record,
    pub created: bool,
}

impl RoomResolution {
    fn from_step(step: RoomStep, room: Record) -> Self {
        Self {
            room,
            created: step == RoomStep::Create,
        }
    }
}

/// Find or create the room titled `title`
///
/// # Errors
/// * `InvalidInput` - title empty after trimming
/// * `NotAllowed` - anonymous create denied and no elevation configured
/// * `ElevationUnavailable` - elevated session could not be obtained
/// * passthrough - any other backend failure, with its status
pub async fn resolve_room(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
    title: &str,
) -> Result<RoomResolution, BackendError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BackendError::invalid_input("title is required"));
    }

    let filter = Filter::eq("title", title);
    let body = json!({ "title": title, "createdAtMs": now_ms() });

    if elevation.is_configured() {
        resolve_elevated(store, elevation, &filter, &body).await
    } else {
        resolve_anonymous(store, &filter, &body).await
    }
}

async fn resolve_elevated(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
    filter: &Filter,
    body: &serde_json::Value,
) -> Result<RoomResolution, BackendError> {
    let outcome = elevated_policy()
        .run(move |step| {
            elevation.run(move |token| async move {
                let access = Access::Token(&token);
                match step {
                    RoomStep::Lookup => {
                        store
                            .first_list_item(collections::ROOMS, filter, access)
                            .await
                    }
                    RoomStep::Create => {
                        store
                            .create_record(collections::ROOMS, body, access)
                            .await
                    }
                }
            })
        })
        .await;

    match outcome {
        Ok((step, room)) => {
            tracing::info!(?step, id = %room.id, "createRoom: resolved (elevated)");
            Ok(RoomResolution::from_step(step, room))
        }
        Err(ChainFailure {
            strategy, error, ..
        }) => {
            tracing::error!(?strategy, error = %error, "createRoom: elevated path failed");
            Err(error.into())
        }
    }
}

async fn resolve_anonymous(
    store: &dyn RecordStore,
    filter: &Filter,
    body: &serde_json::Value,
) -> Result<RoomResolution, BackendError> {
    let outcome = anonymous_policy()
        .run(move |step| async move {
            let result = match step {
                RoomStep::Create => {
                    store
                        .create_record(collections::ROOMS, body, Access::Anonymous)
                        .await
                }
                RoomStep::Lookup => {
                    store
                        .first_list_item(collections::ROOMS, filter, Access::Anonymous)
                        .await
                }
            };
            result.map_err(StepError::from)
        })
        .await;

    match outcome {
        Ok((step, room)) => {
            tracing::info!(?step, id = %room.id, "createRoom: resolved");
            Ok(RoomResolution::from_step(step, room))
        }
        Err(ChainFailure {
            strategy: RoomStep::Create,
            error,
            ..
        }) if error.class() == ErrorClass::Forbidden => {
            tracing::warn!("createRoom: anonymous create denied and no elevation configured");
            Err(BackendError::NotAllowed)
        }
        Err(failure) => Err(lookup_failure(failure)),
    }
}

/// Surface the failure that ended the anonymous chain
///
/// A lookup that got no answer borrows the status of the failed create.
fn lookup_failure(failure: ChainFailure<RoomStep>) -> BackendError {
    tracing::error!(strategy = ?failure.strategy, error = %failure.error, "createRoom: failed");

    let error = match failure.error {
        StepError::Store(error) => error,
        other => return other.into(),
    };
    if error.status().is_some() {
        return error.into();
    }

    let create_status = failure.earlier.iter().find_map(|(step, earlier)| match earlier {
        StepError::Store(e) if *step == RoomStep::Create => e.status(),
        _ => None,
    });
    match create_status {
        Some(status) => BackendError::upstream(status, error.message()),
        None => BackendError::server(error.message()),
    }
}
