/**
 * Identity Prober
 *
 * Answers "does an account exist for this identity?" so the client can pick
 * the login or the registration branch.
 *
 * # Candidates
 *
 * - identity contains `@` - email match only
 * - otherwise - username match, then email match
 *
 * # Per Candidate
 *
 * 1. Anonymous lookup. Not found means absent.
 * 2. Denied (403/401, or a 400 list rejection when the filter touches
 *    hidden fields) - retry elevated if elevation is configured.
 * 3. Elevated failures of any kind report the candidate as absent.
 * 4. Any other anonymous failure is fatal (500).
 */

use super::elevation::ElevatedSessionCache;
use super::policy::{ChainFailure, ErrorClass, Policy, Privilege, StepError};
use crate::backend::error::BackendError;
use crate::backend::store::{collections, Access, Filter, RecordStore};
use crate::shared::Record;

/// Anonymous lookups that escalate
const PROBE_ESCALATION: &[ErrorClass] = &[ErrorClass::Forbidden, ErrorClass::Invalid];

/// Lookup predicates for an identity, in probe order
///
/// # Arguments
/// * `identity` - Trimmed email or username
pub fn candidate_filters(identity: &str) -> Vec<Filter> {
    if identity.contains('@') {
        vec![Filter::eq("email", identity)]
    } else {
        vec![
            Filter::eq("username", identity),
            Filter::eq("email", identity),
        ]
    }
}

/// Strategy chain for one candidate
pub fn probe_policy(elevation_configured: bool) -> Policy<Privilege> {
    let policy = Policy::new(Privilege::Anonymous);
    if elevation_configured {
        policy.then(PROBE_ESCALATION, Privilege::Elevated)
    } else {
        policy
    }
}

/// Check whether an account matches `identity`
///
/// # Returns
/// `true` on the first matching candidate, `false` when all are exhausted
///
/// # Errors
/// * `InvalidInput` - identity empty after trimming
/// * `ServerError` - unexpected anonymous lookup failure
pub async fn identity_exists(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
    identity: &str,
) -> Result<bool, BackendError> {
    let identity = identity.trim();
    if identity.is_empty() {
        return Err(BackendError::invalid_input("identity is required"));
    }

    let policy = probe_policy(elevation.is_configured());
    for filter in candidate_filters(identity) {
        if probe(store, elevation, &policy, &filter).await? {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn probe(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
    policy: &Policy<Privilege>,
    filter: &Filter,
) -> Result<bool, BackendError> {
    let outcome = policy
        .run(|privilege| lookup(store, elevation, filter, privilege))
        .await;

    match outcome {
        Ok((privilege, _)) => {
            tracing::debug!(?privilege, "preLogin: candidate exists");
            Ok(true)
        }
        Err(ChainFailure { error, .. }) if error.class() == ErrorClass::NotFound => Ok(false),
        Err(ChainFailure {
            strategy: Privilege::Elevated,
            error,
            ..
        }) => {
            tracing::warn!(error = %error, "preLogin: elevated lookup failed, treating as absent");
            Ok(false)
        }
        Err(ChainFailure { error, .. }) if PROBE_ESCALATION.contains(&error.class()) => {
            tracing::debug!("preLogin: lookup denied and no elevation configured");
            Ok(false)
        }
        Err(ChainFailure { error, .. }) => {
            tracing::error!(error = %error, "preLogin: lookup failed");
            Err(BackendError::server(error.to_string()))
        }
    }
}

async fn lookup(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
    filter: &Filter,
    privilege: Privilege,
) -> Result<Record, StepError> {
    match privilege {
        Privilege::Anonymous => Ok(store
            .first_list_item(collections::USERS, filter, Access::Anonymous)
            .await?),
        Privilege::Elevated => {
            elevation
                .run(move |token| async move {
                    store
                        .first_list_item(collections::USERS, filter, Access::Token(&token))
                        .await
                })
                .await
        }
    }
}
