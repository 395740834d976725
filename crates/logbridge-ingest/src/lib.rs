//! Ingestion pipeline for browser agent log batches
//!
//! The agent POSTs a batch of structured log messages to `/_bridge/log`.
//! This crate owns the wire types, the per-message transforms (source
//! location resolution, exception reconstruction, detail block assembly),
//! the batch processor that drives them, and the axum handler + plugin
//! that expose the endpoint.

pub mod error;
pub mod handlers;
pub mod plugin;
pub mod services;
pub mod types;

pub use error::IngestError;
pub use plugin::LogIngestPlugin;
pub use services::LogIngestionService;
pub use types::{BatchAck, LogBatch, LogMessage, RawException, RawSourceInfo};

/// Source application tag stamped on every entry that passes through the
/// bridge, so host-side consumers can tell agent entries from native ones.
pub const SOURCE_APPLICATION: &str = "Loupe Agent";
