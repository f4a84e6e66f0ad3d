/**
 * Typed Filter Predicates
 *
 * Flows build filters as values; each store decides how to apply them.
 * The PocketBase client renders them into the backend's filter language,
 * the memory store evaluates them against records directly.
 *
 * # Rendering
 *
 * ```text
 * Filter::eq("email", "a@b.c")                      -> email = "a@b.c"
 * Filter::eq("from", "bob").and(Filter::eq("n", 5)) -> from = "bob" && n = 5
 * ```
 */
use serde_json::Value;

use crate::shared::Record;

/// Filter predicate over record fields
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact equality on one field
    Eq { field: String, value: Value },
    /// All predicates must hold
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Conjunction, flattening nested `And`s
    pub fn and(self, other: Filter) -> Self {
        let mut parts = match self {
            Self::And(parts) => parts,
            single => vec![single],
        };
        match other {
            Self::And(more) => parts.extend(more),
            single => parts.push(single),
        }
        Self::And(parts)
    }

    /// Evaluate against a record
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::Eq { field, value } => record.get(field).as_ref() == Some(value),
            Self::And(parts) => parts.iter().all(|part| part.matches(record)),
        }
    }

    /// Render as a PocketBase filter expression
    pub fn render(&self) -> String {
        match self {
            Self::Eq { field, value } => format!("{} = {}", field, render_value(value)),
            Self::And(parts) => parts
                .iter()
                .map(Filter::render)
                .collect::<Vec<_>>()
                .join(" && "),
        }
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", escape_filter_value(s)),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Escape a string for use inside a double-quoted filter literal
///
/// The backend's scanner only unescapes `\"`; backslashes pass through as-is.
pub fn escape_filter_value(raw: &str) -> String {
    raw.replace('"', "\\\"")
}
