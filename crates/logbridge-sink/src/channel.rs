use logbridge_core::async_trait::async_trait;
use logbridge_core::entry::LogEntry;
use logbridge_core::sink::{LogEntrySink, SinkError};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Bounded-channel sink. `enqueue` hands the entry to the channel with
/// `try_send` and returns immediately; it never waits for the worker.
#[derive(Clone)]
pub struct ChannelLogSink {
    sender: mpsc::Sender<LogEntry>,
}

impl ChannelLogSink {
    pub fn new(sender: mpsc::Sender<LogEntry>) -> Self {
        Self { sender }
    }

    /// Create a sink and its receiving end. The receiver must be handed to a
    /// [`SinkWorker`] (or kept alive some other way) or every enqueue will
    /// fail with [`SinkError::Closed`].
    pub fn create_channel(capacity: usize) -> (ChannelLogSink, mpsc::Receiver<LogEntry>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (ChannelLogSink::new(sender), receiver)
    }
}

#[async_trait]
impl LogEntrySink for ChannelLogSink {
    async fn enqueue(&self, entry: LogEntry) -> Result<(), SinkError> {
        self.sender.try_send(entry).map_err(|e| match e {
            mpsc::error::TrySendError::Full(entry) => {
                warn!(
                    category = %entry.category,
                    "log queue full, dropping entry"
                );
                SinkError::QueueFull
            }
            mpsc::error::TrySendError::Closed(_) => {
                error!("log queue closed, dropping entry");
                SinkError::Closed
            }
        })
    }
}

/// Drains the sink channel on its own task and re-emits each entry through
/// the process log. The durable logging engine sits behind this boundary;
/// swapping it in means replacing `write_entry`.
pub struct SinkWorker {
    receiver: mpsc::Receiver<LogEntry>,
}

impl SinkWorker {
    pub fn new(receiver: mpsc::Receiver<LogEntry>) -> Self {
        Self { receiver }
    }

    /// Spawn the drain loop. Runs until every sender is dropped.
    pub fn spawn(mut self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            debug!("sink worker started");
            while let Some(entry) = self.receiver.recv().await {
                write_entry(&entry);
            }
            debug!("sink worker stopped, channel closed");
        })
    }
}

fn write_entry(entry: &LogEntry) {
    let exception = entry
        .exception
        .as_ref()
        .map(|e| e.message.as_str())
        .unwrap_or("");

    info!(
        target: "logbridge::entries",
        severity = %entry.severity,
        category = %entry.category,
        caption = %entry.caption,
        session_id = %entry.session_id,
        identity = %entry.identity,
        file = %entry.location.file,
        line = entry.location.line,
        exception = %exception,
        "{}",
        entry.description
    );
}
