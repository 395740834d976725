//! Host-side log entry model
//!
//! These are the types handed to a [`crate::sink::LogEntrySink`] once a raw
//! agent message has been through the ingestion transforms. The wire-level
//! (agent) types live in the ingest crate; everything here is already
//! validated and displayable.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Severity of a log entry, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ToSchema)]
pub enum Severity {
    Verbose,
    Information,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Verbose => "verbose",
            Severity::Information => "information",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

struct SeverityVisitor;

impl<'de> Visitor<'de> for SeverityVisitor {
    type Value = Severity;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a severity name or agent severity code (1, 2, 4, 8, 16)")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Severity, E> {
        match value.to_ascii_lowercase().as_str() {
            "verbose" => Ok(Severity::Verbose),
            "information" | "info" => Ok(Severity::Information),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(E::custom(format!("unknown severity '{}'", other))),
        }
    }

    // The browser agent sends severities as bit-flag codes.
    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Severity, E> {
        match value {
            1 => Ok(Severity::Critical),
            2 => Ok(Severity::Error),
            4 => Ok(Severity::Warning),
            8 => Ok(Severity::Information),
            16 => Ok(Severity::Verbose),
            other => Err(E::custom(format!("unknown severity code {}", other))),
        }
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Severity, E> {
        u64::try_from(value)
            .map_err(|_| E::custom(format!("unknown severity code {}", value)))
            .and_then(|v| self.visit_u64(v))
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SeverityVisitor)
    }
}

/// Resolved source location of a log message.
///
/// Always displayable: callers that cannot supply a location get
/// [`SourceLocation::unknown`], never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

pub const UNKNOWN_SOURCE_FILE: &str = "(unknown)";

impl SourceLocation {
    /// Sentinel location for messages without usable source info.
    pub fn unknown() -> Self {
        Self {
            file: UNKNOWN_SOURCE_FILE.to_string(),
            line: 0,
            column: 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.file == UNKNOWN_SOURCE_FILE && self.line == 0 && self.column == 0
    }
}

/// Exception context rebuilt from an agent payload.
///
/// The stack trace is client-supplied text and is stored verbatim; no frame
/// parsing happens on the host side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReconstructedException {
    pub message: String,
    pub stack_trace: String,
}

/// A fully-reconstructed log entry, ready for the sink.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub severity: Severity,
    /// Fixed tag identifying entries that came through this bridge.
    pub source_application: &'static str,
    pub location: SourceLocation,
    /// Caller identity label; empty for anonymous callers.
    pub identity: String,
    /// Effective (host) session id resolved for the request; may be empty.
    pub session_id: String,
    pub exception: Option<ReconstructedException>,
    /// Structured detail attachment built per message.
    pub details: serde_json::Value,
    pub category: String,
    pub caption: String,
    pub description: String,
    pub parameters: Vec<serde_json::Value>,
}
