/**
 * Chat Schema
 *
 * Collection definitions for rooms and messages, and the elevated
 * bootstrap that puts them in place on a backend.
 *
 * Both collections are readable by any authenticated account. Room creation
 * stays superuser-only so clients go through `/createRoom`; messages can be
 * created by any authenticated account.
 */

use super::ProvisionError;
use crate::backend::auth::elevation::ElevatedSessionCache;
use crate::backend::store::{
    collections, Access, CollectionInfo, CollectionRules, CollectionSchema, FieldSpec,
    RecordStore, StoreError,
};

/// Rule expression satisfied by any authenticated caller
pub const AUTHENTICATED_RULE: &str = r#"@request.auth.id != """#;

fn authenticated() -> Option<String> {
    Some(AUTHENTICATED_RULE.to_string())
}

/// `rooms` collection
pub fn rooms_schema() -> CollectionSchema {
    CollectionSchema {
        name: collections::ROOMS.to_string(),
        kind: "base".to_string(),
        fields: vec![
            FieldSpec::new("title", "text", true),
            FieldSpec::new("createdAtMs", "number", false),
        ],
        rules: CollectionRules {
            list_rule: authenticated(),
            view_rule: authenticated(),
            create_rule: None,
        },
    }
}

/// `messages` collection
///
/// # Arguments
/// * `rooms_id` - ID of the `rooms` collection targeted by `roomId`
pub fn messages_schema(rooms_id: &str) -> CollectionSchema {
    CollectionSchema {
        name: collections::MESSAGES.to_string(),
        kind: "base".to_string(),
        fields: vec![
            FieldSpec::relation("roomId", rooms_id),
            FieldSpec::new("from", "text", true),
            FieldSpec::new("type", "text", true),
            FieldSpec::new("content", "json", true),
            FieldSpec::new("createdAtMs", "number", true),
            FieldSpec::new("editedAtMs", "number", false),
            FieldSpec::new("status", "text", false),
            FieldSpec::new("refMessageId", "text", false),
            FieldSpec::new("refType", "text", false),
            FieldSpec::new("refContent", "json", false),
        ],
        rules: CollectionRules {
            list_rule: authenticated(),
            view_rule: authenticated(),
            create_rule: authenticated(),
        },
    }
}

/// What `ensure_collection` did
#[derive(Debug, Clone, PartialEq)]
pub enum Ensured {
    /// The collection did not exist and was created
    Created(CollectionInfo),
    /// The collection existed; its rules were brought up to date
    Updated(CollectionInfo),
}

impl Ensured {
    pub fn info(&self) -> &CollectionInfo {
        match self {
            Self::Created(info) | Self::Updated(info) => info,
        }
    }
}

/// Outcome of a schema bootstrap
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaReport {
    pub rooms: Ensured,
    pub messages: Ensured,
}

/// Create `schema`, or update its rules if a collection of that name exists
pub async fn ensure_collection(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
    schema: &CollectionSchema,
) -> Result<Ensured, ProvisionError> {
    let ensured = elevation
        .run(move |token| async move { ensure_with_token(store, schema, &token).await })
        .await?;

    match &ensured {
        Ensured::Created(info) => tracing::info!(collection = %info.name, "Created collection"),
        Ensured::Updated(info) => {
            tracing::info!(collection = %info.name, "Collection exists, rules updated")
        }
    }
    Ok(ensured)
}

async fn ensure_with_token(
    store: &dyn RecordStore,
    schema: &CollectionSchema,
    token: &str,
) -> Result<Ensured, StoreError> {
    let access = Access::Token(token);
    match store.find_collection(&schema.name, access).await? {
        Some(existing) => {
            let rules = merge_rules(&schema.rules, &existing.rules);
            store
                .update_collection_rules(&existing.id, &rules, access)
                .await
                .map(Ensured::Updated)
        }
        None => store
            .create_collection(schema, access)
            .await
            .map(Ensured::Created),
    }
}

/// Rules to apply to an existing collection
///
/// A rule left unset in `desired` keeps its current value, so a
/// superuser-only default never closes an action an operator opened.
fn merge_rules(desired: &CollectionRules, current: &CollectionRules) -> CollectionRules {
    let pick = |want: &Option<String>, have: &Option<String>| want.clone().or_else(|| have.clone());
    CollectionRules {
        list_rule: pick(&desired.list_rule, &current.list_rule),
        view_rule: pick(&desired.view_rule, &current.view_rule),
        create_rule: pick(&desired.create_rule, &current.create_rule),
    }
}

/// Ensure the rooms and messages collections
///
/// # Errors
/// * `ProvisionError::Elevation` - no credentials, or authentication failed
/// * `ProvisionError::Store` - a collection call failed
pub async fn ensure_schema(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
) -> Result<SchemaReport, ProvisionError> {
    let rooms = ensure_collection(store, elevation, &rooms_schema()).await?;
    let messages =
        ensure_collection(store, elevation, &messages_schema(&rooms.info().id)).await?;
    tracing::info!("Schema ready");
    Ok(SchemaReport { rooms, messages })
}
