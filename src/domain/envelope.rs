//! Remote API response envelope
//!
//! Every endpoint of the clinic-management API answers with the same wrapper:
//! `{ data: T | null | array, meta: { status: "success" | "error", message } }`.
//!
//! The central design quirk this crate must tolerate: the authoritative
//! human-readable outcome is always `meta.message`, regardless of the
//! transport-level HTTP status. An HTTP 500 response can carry
//! `meta.status = "success"` with an explanatory message. Callers must never
//! trust the HTTP status alone to infer business-level failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Verb of an API call
///
/// Reads serialize their fields as query parameters (the remote API does not
/// accept a body on reads); mutating verbs serialize fields as form-encoded
/// key/value pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVerb {
    /// GET-style call, fields go in the query string
    Read,
    /// POST-style call, form-encoded body
    Create,
    /// PUT-style call, form-encoded body
    Update,
    /// DELETE-style call, form-encoded body
    Delete,
}

impl ApiVerb {
    /// Whether this verb carries its fields in the query string
    pub fn is_read(&self) -> bool {
        matches!(self, ApiVerb::Read)
    }
}

impl std::fmt::Display for ApiVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApiVerb::Read => "READ",
            ApiVerb::Create => "CREATE",
            ApiVerb::Update => "UPDATE",
            ApiVerb::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

/// Semantic status inside the envelope's `meta`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    /// The operation succeeded at the business level
    Success,
    /// The operation failed at the business level
    Error,
}

/// The `meta` block of the response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    /// Business-level outcome, decoupled from the HTTP status
    pub status: EnvelopeStatus,

    /// Authoritative human-readable message
    #[serde(default)]
    pub message: String,
}

/// Decoded `{data, meta}` response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Payload: an object, an array, or null
    #[serde(default)]
    pub data: Value,

    /// Business-level outcome and message
    pub meta: EnvelopeMeta,
}

impl ApiEnvelope {
    /// Try to decode an envelope from an already-parsed JSON value
    ///
    /// Returns `None` when the value is not envelope-shaped; not every error
    /// body the remote API emits carries the wrapper.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Whether `meta.status` reports business-level success
    pub fn is_success(&self) -> bool {
        self.meta.status == EnvelopeStatus::Success
    }

    /// Whether `data` carries any usable content
    ///
    /// `null`, an empty array, an array of nulls, and an empty object all
    /// count as empty. The existence check relies on this to decide whether a
    /// lookup actually found a record.
    pub fn has_data(&self) -> bool {
        value_has_content(&self.data)
    }
}

fn value_has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => items.iter().any(value_has_content),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Extract the authoritative message from a decoded response body
///
/// Priority order: `meta.message` > top-level `message` > top-level `error` >
/// the raw body when it is a plain string. The returned message is trimmed of
/// surrounding whitespace. Returns `None` when no message can be found;
/// callers then fall back to the HTTP status phrase.
pub fn authoritative_message(body: &Value) -> Option<String> {
    if let Some(msg) = body
        .get("meta")
        .and_then(|meta| meta.get("message"))
        .and_then(Value::as_str)
    {
        let msg = msg.trim();
        if !msg.is_empty() {
            return Some(msg.to_string());
        }
    }

    for key in ["message", "error"] {
        if let Some(msg) = body.get(key).and_then(Value::as_str) {
            let msg = msg.trim();
            if !msg.is_empty() {
                return Some(msg.to_string());
            }
        }
    }

    if let Value::String(raw) = body {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    None
}

/// A decoded transport-level response
///
/// Workflows need the HTTP status alongside the body: 207 signals partial
/// success (primary effect done, a secondary effect degraded) and the body
/// must then be inspected for warning content.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code of the response
    pub status: u16,

    /// Decoded body (JSON when the content type is JSON, raw text otherwise)
    pub body: Value,
}

impl ApiResponse {
    /// Whether this response was a 207 partial success
    pub fn is_partial(&self) -> bool {
        self.status == 207
    }

    /// Decode the body as an envelope, when it is envelope-shaped
    pub fn envelope(&self) -> Option<ApiEnvelope> {
        ApiEnvelope::from_value(&self.body)
    }
}
