//! Record Store Module
//!
//! This module defines the backend-client abstraction every flow talks to.
//! The backend owns persistence, filtering and token issuance; this layer
//! only issues lookups, creates and password exchanges against it.
//!
//! # Implementations
//!
//! - **`pocketbase`** - reqwest client for a remote PocketBase instance
//! - **`memory`** - in-process dummy store for local testing, wiped on restart
//!
//! Exactly one implementation is selected at startup and shared behind
//! `Arc<dyn RecordStore>`.
//!
//! # Error Classification
//!
//! Implementations map backend failures into [`StoreError`] so flows can
//! branch on a variant instead of inspecting messages:
//!
//! | Backend answer | Variant |
//! |---|---|
//! | 404 / empty lookup | `NotFound` |
//! | 401, 403 | `Forbidden` |
//! | 400 with a uniqueness failure | `Duplicate` |
//! | other 400 | `Invalid` |
//! | anything else | `Upstream` |
//! | no response | `Transport` |

/// Typed filter predicates
pub mod filter;

/// PocketBase REST client
pub mod pocketbase;

/// In-memory dummy store
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::shared::Record;

pub use filter::{escape_filter_value, Filter};
pub use memory::MemoryStore;
pub use pocketbase::PocketBaseStore;

/// Collection names used by the chat schema
pub mod collections {
    /// Regular user accounts
    pub const USERS: &str = "users";
    /// Privileged accounts
    pub const SUPERUSERS: &str = "_superusers";
    /// Chat rooms
    pub const ROOMS: &str = "rooms";
    /// Chat messages
    pub const MESSAGES: &str = "messages";
}

/// Credential attached to a backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<'a> {
    /// No credential; subject to the collection's public rules
    Anonymous,
    /// Bearer token (user or elevated)
    Token(&'a str),
}

/// Token plus account snapshot returned by a password exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    /// Bearer token
    pub token: String,
    /// Authenticated account (`admin` in the legacy response shape)
    #[serde(alias = "admin")]
    pub record: Record,
}

/// Backend failure, classified
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// Nothing matched, or the collection/record does not exist
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The caller's credential does not satisfy the collection rules
    #[error("forbidden ({status}): {message}")]
    Forbidden { status: u16, message: String },

    /// A unique field already holds the submitted value
    #[error("duplicate: {message}")]
    Duplicate { message: String },

    /// Request rejected as malformed
    #[error("invalid request: {message}")]
    Invalid { message: String },

    /// Any other backend status
    #[error("backend error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// No response received
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl StoreError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn forbidden(status: u16, message: impl Into<String>) -> Self {
        Self::Forbidden {
            status,
            message: message.into(),
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// HTTP status the backend answered with, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Forbidden { status, .. } => Some(*status),
            Self::Duplicate { .. } | Self::Invalid { .. } => Some(400),
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Backend-supplied message, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message }
            | Self::Forbidden { message, .. }
            | Self::Duplicate { message }
            | Self::Invalid { message }
            | Self::Upstream { message, .. }
            | Self::Transport { message } => message,
        }
    }

    /// The backend refused the token itself (expired or revoked)
    pub fn is_token_rejected(&self) -> bool {
        matches!(self, Self::Forbidden { status: 401, .. })
    }
}

/// One field of a collection schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascade_delete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_select: Option<u32>,
}

impl FieldSpec {
    pub fn new(name: &str, kind: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            required,
            collection_id: None,
            cascade_delete: None,
            max_select: None,
        }
    }

    /// Single relation to another collection, deleted along with its target
    pub fn relation(name: &str, collection_id: &str) -> Self {
        Self {
            collection_id: Some(collection_id.to_string()),
            cascade_delete: Some(true),
            max_select: Some(1),
            ..Self::new(name, "relation", true)
        }
    }
}

/// Access rules of a collection
///
/// `None` restricts the action to superusers, `Some("")` opens it to
/// everyone, any other expression is evaluated by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRules {
    #[serde(default)]
    pub list_rule: Option<String>,
    #[serde(default)]
    pub view_rule: Option<String>,
    #[serde(default)]
    pub create_rule: Option<String>,
}

/// Definition used to create a collection
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollectionSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub fields: Vec<FieldSpec>,
    #[serde(flatten)]
    pub rules: CollectionRules,
}

/// Collection as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionInfo {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub rules: CollectionRules,
}

/// Backend-client abstraction
///
/// Every method is a single backend round trip; retries and fallbacks belong
/// to the calling flow.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// First record matching `filter`, or `NotFound`
    async fn first_list_item(
        &self,
        collection: &str,
        filter: &Filter,
        access: Access<'_>,
    ) -> Result<Record, StoreError>;

    /// Create a record from a JSON object body
    async fn create_record(
        &self,
        collection: &str,
        body: &Value,
        access: Access<'_>,
    ) -> Result<Record, StoreError>;

    /// Patch an existing record
    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        body: &Value,
        access: Access<'_>,
    ) -> Result<Record, StoreError>;

    /// Exchange identity (email or username) and password for a session
    async fn auth_with_password(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError>;

    /// Pre-superuser-collection elevated login
    async fn legacy_admin_auth(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError>;

    /// Collection by name, `None` when absent
    async fn find_collection(
        &self,
        name: &str,
        access: Access<'_>,
    ) -> Result<Option<CollectionInfo>, StoreError>;

    async fn create_collection(
        &self,
        schema: &CollectionSchema,
        access: Access<'_>,
    ) -> Result<CollectionInfo, StoreError>;

    async fn update_collection_rules(
        &self,
        id: &str,
        rules: &CollectionRules,
        access: Access<'_>,
    ) -> Result<CollectionInfo, StoreError>;

    /// Drop a token from the live set. Stateless backends keep nothing and
    /// return `false`.
    async fn revoke_token(&self, _token: &str) -> bool {
        false
    }
}
