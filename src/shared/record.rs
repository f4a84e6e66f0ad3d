/**
 * Backend Records
 *
 * Every entity the backend owns (accounts, rooms, messages) travels as a
 * record: a JSON object with a string `id` and arbitrary fields. The server
 * passes records through to clients untouched, so the type keeps the field
 * map open instead of modelling each collection.
 */
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single backend record
///
/// Serializes as a flat JSON object: `{ "id": "...", "title": "...", ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Backend-assigned record ID
    pub id: String,
    /// All other fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record from an ID and a field map
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Look up a field; `id` resolves to the record ID
    pub fn get(&self, field: &str) -> Option<Value> {
        if field == "id" {
            return Some(Value::String(self.id.clone()));
        }
        self.fields.get(field).cloned()
    }

    /// Look up a string field
    pub fn str_field(&self, field: &str) -> Option<&str> {
        if field == "id" {
            return Some(&self.id);
        }
        self.fields.get(field).and_then(Value::as_str)
    }
}
