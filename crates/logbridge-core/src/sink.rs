//! Sink boundary: the host's log-write primitive
//!
//! The bridge never waits for durable persistence. Implementations must
//! return from `enqueue` once the entry has been handed off; queueing and
//! durability are the sink's own concern.

use async_trait::async_trait;
use thiserror::Error;

use crate::entry::LogEntry;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("sink queue is full, entry dropped")]
    QueueFull,

    #[error("sink is closed")]
    Closed,

    #[error("sink error: {0}")]
    Internal(String),
}

/// The host logging engine's write primitive, consumed as an opaque
/// collaborator. One call per message, non-blocking.
#[async_trait]
pub trait LogEntrySink: Send + Sync {
    /// Hand an entry to the sink. Must not block waiting for a durable
    /// write; completion of this call only means the entry was enqueued.
    async fn enqueue(&self, entry: LogEntry) -> Result<(), SinkError>;
}
