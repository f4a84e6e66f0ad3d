/**
 * Chat Message Payload
 *
 * This module defines the Message struct stored in the `messages`
 * collection. The server never reads messages itself; the type exists so
 * provisioning can seed a room and clients can share the wire shape.
 *
 * Field names follow the backend collection schema (camelCase on the wire).
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a single chat message as stored by the backend
///
/// # Fields
/// * `from` - Display name or identity of the author
/// * `kind` - Message type (`text`, `image`, ...), `type` on the wire
/// * `content` - Arbitrary JSON payload, `{ "text": ... }` for text messages
/// * `created_at_ms` - Creation time in Unix milliseconds
///
/// Together `from` and `created_at_ms` identify a message for seeding upserts.
///
/// # Example
/// ```rust
/// use pbchat::shared::Message;
///
/// let message = Message::new_text("alice", "Hello, world!");
/// assert_eq!(message.kind, "text");
/// assert_eq!(message.text(), Some("Hello, world!"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Author
    pub from: String,
    /// Message type
    #[serde(rename = "type")]
    pub kind: String,
    /// Message payload
    pub content: Value,
    /// Creation time (Unix ms)
    pub created_at_ms: i64,
    /// Last edit time (Unix ms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at_ms: Option<i64>,
    /// Delivery status (`sent`, `read`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Referenced message (replies, reactions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_message_id: Option<String>,
    /// Kind of reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
    /// Snapshot of the referenced content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_content: Option<Value>,
}

impl Message {
    /// Create a text message stamped with the current time
    pub fn new_text(from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            kind: "text".to_string(),
            content: serde_json::json!({ "text": text.into() }),
            created_at_ms: now_ms(),
            edited_at_ms: None,
            status: Some("sent".to_string()),
            ref_message_id: None,
            ref_type: None,
            ref_content: None,
        }
    }

    /// The `content.text` value, if this is a text payload
    pub fn text(&self) -> Option<&str> {
        self.content.get("text").and_then(Value::as_str)
    }
}

/// Current time in Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
