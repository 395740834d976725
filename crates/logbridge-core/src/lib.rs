//! Core utilities and types shared across all Logbridge crates

pub mod entry;
pub mod error_builder;
pub mod plugin;
pub mod problemdetails;
pub mod sink;
mod request_context;

pub use problemdetails::ProblemDetails;

// Re-export commonly used types
pub use entry::{LogEntry, ReconstructedException, Severity, SourceLocation};
pub use error_builder::*;
pub use request_context::{RequestContext, AGENT_SESSION_ID, HOST_SESSION_ID};
pub use sink::{LogEntrySink, SinkError};

// Re-export external dependencies
pub use anyhow;
pub use async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tokio;
pub use tracing;
pub use uuid;
