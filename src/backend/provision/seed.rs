/**
 * Message Seeding
 *
 * Loads demo messages from a JSON file and upserts them into a room.
 *
 * A message is identified by `from` + `createdAtMs`: re-running the seed
 * updates existing messages in place instead of duplicating them.
 *
 * # Seed File
 *
 * A JSON array of messages in wire form:
 *
 * ```json
 * [
 *   { "from": "alice", "type": "text", "content": { "text": "Hi" }, "createdAtMs": 1700000000000 }
 * ]
 * ```
 */

use std::path::Path;

use serde_json::Value;

use super::ProvisionError;
use crate::backend::auth::elevation::ElevatedSessionCache;
use crate::backend::rooms::resolver::resolve_room;
use crate::backend::store::{collections, Access, Filter, RecordStore, StoreError};
use crate::shared::{Message, Record};

/// Seed file used when none is given
pub const DEFAULT_SEED_FILE: &str = "seed/messages.json";

/// Room seeded when none is given
pub const DEFAULT_ROOM: &str = "room-123";

/// Read and parse a seed file
///
/// # Errors
/// * `SeedRead` - the file cannot be read
/// * `SeedFormat` - not JSON, not an array, or an entry is not a message
pub async fn load_seed_messages(path: &Path) -> Result<Vec<Message>, ProvisionError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ProvisionError::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;

    let format_error = |reason: String| ProvisionError::SeedFormat {
        path: path.to_path_buf(),
        reason,
    };

    let value: Value = serde_json::from_str(&raw).map_err(|e| format_error(e.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(format_error("must be an array".to_string()));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry).map_err(|e| format_error(format!("entry {index}: {e}")))
        })
        .collect()
}

/// Outcome of a seed run
#[derive(Debug, Clone, PartialEq)]
pub struct SeedReport {
    pub room: Record,
    pub room_created: bool,
    pub created: usize,
    pub updated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Upsert {
    Created,
    Updated,
}

/// Get-or-create `room_title` and upsert `messages` into it
pub async fn seed_messages(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
    room_title: &str,
    messages: &[Message],
) -> Result<SeedReport, ProvisionError> {
    let resolution = resolve_room(store, elevation, room_title).await?;
    tracing::info!(
        room = %resolution.room.id,
        created = resolution.created,
        "Seeding messages into room"
    );

    let mut report = SeedReport {
        room: resolution.room,
        room_created: resolution.created,
        created: 0,
        updated: 0,
    };

    for message in messages {
        match upsert_message(store, elevation, &report.room.id, message).await? {
            Upsert::Created => report.created += 1,
            Upsert::Updated => report.updated += 1,
        }
    }

    tracing::info!(created = report.created, updated = report.updated, "Seed complete");
    Ok(report)
}

fn message_body(room_id: &str, message: &Message) -> Value {
    let mut body =
        serde_json::to_value(message).unwrap_or_else(|_| Value::Object(Default::default()));
    if let Value::Object(fields) = &mut body {
        fields.insert("roomId".to_string(), Value::from(room_id));
    }
    body
}

async fn upsert_message(
    store: &dyn RecordStore,
    elevation: &ElevatedSessionCache,
    room_id: &str,
    message: &Message,
) -> Result<Upsert, ProvisionError> {
    let filter = Filter::eq("from", message.from.as_str())
        .and(Filter::eq("createdAtMs", message.created_at_ms));
    let body = message_body(room_id, message);
    let (filter, body) = (&filter, &body);

    let upsert = elevation
        .run(move |token| async move {
            let access = Access::Token(&token);
            match store
                .first_list_item(collections::MESSAGES, filter, access)
                .await
            {
                Ok(existing) => store
                    .update_record(collections::MESSAGES, &existing.id, body, access)
                    .await
                    .map(|_| Upsert::Updated),
                Err(StoreError::NotFound { .. }) => store
                    .create_record(collections::MESSAGES, body, access)
                    .await
                    .map(|_| Upsert::Created),
                Err(e) => Err(e),
            }
        })
        .await?;

    tracing::debug!(
        from = %message.from,
        created_at_ms = message.created_at_ms,
        ?upsert,
        "Upserted message"
    );
    Ok(upsert)
}
