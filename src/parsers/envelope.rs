//! Wire shapes of session log records.
//!
//! Every line is an [`Envelope`]; its `payload` stays an opaque [`Value`] until the
//! envelope type says how to read it.

use serde::Deserialize;
use serde_json::Value;

pub const TYPE_SESSION_META: &str = "session_meta";
pub const TYPE_RESPONSE_ITEM: &str = "response_item";
pub const TYPE_MESSAGE: &str = "message";
pub const TYPE_REASONING: &str = "reasoning";

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "super::deserializers::deserialize_timestamp_text")]
    pub timestamp: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "super::deserializers::deserialize_null_default"
    )]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    pub fn decode(line: &str) -> Option<Self> {
        serde_json::from_str(line).ok()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPart {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "super::deserializers::deserialize_null_default"
    )]
    pub part_type: String,
    #[serde(default, deserialize_with = "super::deserializers::deserialize_null_default")]
    pub text: String,
}

/// Payload of a `response_item` record, and of legacy top-level `message` lines
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseItem {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "super::deserializers::deserialize_null_default"
    )]
    pub item_type: String,
    #[serde(default, deserialize_with = "super::deserializers::deserialize_null_default")]
    pub role: String,
    #[serde(default, deserialize_with = "super::deserializers::deserialize_null_default")]
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReasoningItem {
    #[serde(default, deserialize_with = "super::deserializers::deserialize_null_default")]
    pub summary: Vec<ContentPart>,
}

/// Join the non-empty text fragments with newlines and trim the result
pub fn join_text(parts: &[ContentPart]) -> String {
    let texts: Vec<&str> =
        parts.iter().map(|p| p.text.as_str()).filter(|t| !t.is_empty()).collect();
    texts.join("\n").trim().to_string()
}

/// Pretty-print a payload for display, falling back to compact form
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
