//! Wire-level types for the agent log endpoint.
//!
//! These mirror what the browser agent actually sends. Field validation is
//! deliberately loose: a batch that deserializes is accepted, and per-field
//! problems (negative line numbers, empty exceptions) are repaired by the
//! transforms rather than rejected here. Only a body that fails to
//! deserialize at all is a client error.

use std::collections::BTreeMap;

use logbridge_core::entry::Severity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A batch of log messages submitted by the agent in one request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogBatch {
    /// Agent's self-reported session id; may be empty for fresh sessions.
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<LogMessage>,
}

/// One log message inside a batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogMessage {
    pub severity: Severity,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<serde_json::Value>,
    #[serde(default)]
    pub source_info: Option<RawSourceInfo>,
    #[serde(default)]
    pub exception: Option<RawException>,
    /// Any additional fields the agent attached; carried into the entry's
    /// detail block untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Source location as reported by the agent.
///
/// Line and column are signed: agents have been observed sending -1 for
/// "unknown", and those values must survive deserialization so the resolver
/// can fall back instead of the request failing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceInfo {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: i64,
    #[serde(default)]
    pub column: i64,
    #[serde(default)]
    pub method: Option<String>,
}

/// Exception payload as reported by the agent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawException {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stack_trace: String,
}

impl RawException {
    /// An exception object with no content means "no exception".
    pub fn is_empty(&self) -> bool {
        self.message.is_empty() && self.stack_trace.is_empty()
    }
}

/// Acknowledgement returned for a processed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchAck {
    /// Messages handed to the sink.
    pub accepted: usize,
    /// Messages the sink refused (queue full / closed).
    pub dropped: usize,
}
