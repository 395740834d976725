//! Queued sink implementations for the log bridge
//!
//! [`ChannelLogSink`] is the production sink: a bounded mpsc channel whose
//! `enqueue` never blocks the caller, paired with a [`SinkWorker`] that
//! drains entries on its own task. [`RecordingSink`] captures entries for
//! assertions in tests.

mod channel;
mod recording;

pub use channel::{ChannelLogSink, SinkWorker, DEFAULT_QUEUE_CAPACITY};
pub use recording::RecordingSink;
