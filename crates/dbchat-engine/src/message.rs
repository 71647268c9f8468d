//! Message types for the dbchat transcript.
//!
//! A message carries one of three content shapes: plain text, an error
//! description, or a structured query result returned by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (greeting shown before the first question).
    System,
    /// User message.
    User,
    /// Assistant (backend) response.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Tabular result returned by the backend.
///
/// Every field is optional and rendered independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    /// Short prose summary of the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    /// Query text the backend executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    /// Column headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    /// Result rows; cells are opaque JSON values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<Value>>>,
}

impl StructuredResult {
    /// Build a structured result from a JSON object, dropping fields with the
    /// wrong shape instead of failing.
    fn from_object(object: &serde_json::Map<String, Value>) -> Self {
        let string_field = |key: &str| object.get(key).and_then(Value::as_str).map(String::from);

        let columns = object.get("columns").and_then(Value::as_array).map(|cols| {
            cols.iter()
                .map(|c| c.as_str().map_or_else(|| c.to_string(), String::from))
                .collect()
        });

        let rows = object.get("rows").and_then(Value::as_array).map(|rows| {
            rows.iter()
                .map(|row| match row {
                    Value::Array(cells) => cells.clone(),
                    other => vec![other.clone()],
                })
                .collect()
        });

        Self {
            narrative: string_field("narrative"),
            sql: string_field("sql"),
            columns,
            rows,
        }
    }
}

/// Content of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageContent {
    /// Plain text shown verbatim.
    Text { text: String },
    /// A failure description.
    Error { error: String },
    /// A structured query result.
    Structured(StructuredResult),
}

/// Whether an `error` field carries a value worth reporting.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl MessageContent {
    /// Plain text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Error content.
    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    /// Decode a raw reply body returned by the chat endpoint.
    ///
    /// Strings become text. Objects whose `error` field is set (anything but
    /// `null`, `false`, `0` or `""`) become errors; a non-string `error` is
    /// shown as compact JSON. Other objects become structured results. Any
    /// other JSON value is shown as its JSON text.
    pub fn from_reply(body: Value) -> Self {
        match body {
            Value::String(text) => Self::Text { text },
            Value::Object(object) => match object.get("error").filter(|e| is_set(e)) {
                Some(Value::String(error)) => Self::error(error.as_str()),
                Some(error) => Self::error(error.to_string()),
                None => Self::Structured(StructuredResult::from_object(&object)),
            },
            other => Self::text(other.to_string()),
        }
    }

    /// Decode a raw reply body that may not be JSON at all.
    pub fn from_reply_text(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_reply(value),
            Err(_) => Self::text(body),
        }
    }

    /// Whether this content is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: Role,
    /// Message content.
    pub content: MessageContent,
    /// Request this message answers (assistant messages only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<u64>,
    /// Timestamp of the message.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::text(text),
            in_reply_to: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::text(text),
            in_reply_to: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant message answering `request_id`.
    pub fn assistant(content: MessageContent, request_id: u64) -> Self {
        Self {
            role: Role::Assistant,
            content,
            in_reply_to: Some(request_id),
            timestamp: Utc::now(),
        }
    }
}
