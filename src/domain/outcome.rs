//! Consolidated workflow outcome
//!
//! The final step of each workflow produces a single [`WorkflowResult`], even
//! when the run involved a degraded sub-operation. Warnings are kept in order
//! of occurrence so the conversational layer can replay them faithfully.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a completed workflow or simple operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    /// Whether the primary effect of the workflow succeeded
    pub success: bool,

    /// Identifier of the created primary record, when one was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_id: Option<i64>,

    /// Identifier of the created secondary record (e.g. product variant)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_id: Option<i64>,

    /// Human-readable outcome message
    pub message: String,

    /// Warnings accumulated along the way, in order of occurrence
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Payload returned by the remote API, when useful to the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl WorkflowResult {
    /// Build a successful result
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            primary_id: None,
            secondary_id: None,
            message: message.into(),
            warnings: Vec::new(),
            payload: None,
        }
    }

    /// Set the primary record id
    pub fn with_primary_id(mut self, id: i64) -> Self {
        self.primary_id = Some(id);
        self
    }

    /// Set the secondary record id
    pub fn with_secondary_id(mut self, id: i64) -> Self {
        self.secondary_id = Some(id);
        self
    }

    /// Append a warning, preserving order of occurrence
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Append several warnings, preserving order of occurrence
    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Attach the remote payload
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}
