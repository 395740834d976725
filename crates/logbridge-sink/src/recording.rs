use std::sync::Mutex;

use logbridge_core::async_trait::async_trait;
use logbridge_core::entry::LogEntry;
use logbridge_core::sink::{LogEntrySink, SinkError};

/// Test sink that records every entry in arrival order.
///
/// `fail_after` turns the sink lossy: once that many entries have been
/// accepted, further enqueues fail with [`SinkError::QueueFull`]. Used to
/// exercise failure-isolation paths without a real bounded queue.
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(accepted: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail_after: Some(accepted),
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl LogEntrySink for RecordingSink {
    async fn enqueue(&self, entry: LogEntry) -> Result<(), SinkError> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(limit) = self.fail_after {
            if entries.len() >= limit {
                return Err(SinkError::QueueFull);
            }
        }
        entries.push(entry);
        Ok(())
    }
}
