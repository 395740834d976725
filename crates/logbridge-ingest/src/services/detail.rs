use serde_json::{json, Value};
use thiserror::Error;

use crate::types::{LogBatch, LogMessage};

/// Default cap on the serialized size of one detail block.
pub const DEFAULT_DETAIL_BLOCK_CAP: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum DetailBlockError {
    #[error("detail block is {size} bytes, cap is {cap}")]
    Oversized { size: usize, cap: usize },
}

/// Builds the structured detail attachment for each entry.
///
/// The block carries batch-level context (batch size, sequence number,
/// agent session id) plus whatever extra fields the client attached to the
/// message. Output is deterministic for a given input; nothing here reads
/// a clock or generates ids, so two identical batches produce identical
/// blocks.
pub struct DetailBlockBuilder {
    cap: usize,
}

impl Default for DetailBlockBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DETAIL_BLOCK_CAP)
    }
}

impl DetailBlockBuilder {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    pub fn build(
        &self,
        batch: &LogBatch,
        index: usize,
        message: &LogMessage,
    ) -> Result<Value, DetailBlockError> {
        let mut block = json!({
            "batchSize": batch.messages.len(),
            "sequence": index,
            "agentSessionId": batch.session_id,
        });

        if let Some(method) = message
            .source_info
            .as_ref()
            .and_then(|info| info.method.as_deref())
        {
            block["sourceMethod"] = json!(method);
        }

        if !message.extra.is_empty() {
            block["clientData"] = json!(message.extra);
        }

        // serde_json can serialize anything it deserialized, so the only
        // failure left is the size cap.
        let size = serde_json::to_string(&block).map(|s| s.len()).unwrap_or(0);
        if size > self.cap {
            return Err(DetailBlockError::Oversized {
                size,
                cap: self.cap,
            });
        }

        Ok(block)
    }

    /// Minimal block substituted when [`build`](Self::build) fails, so the
    /// message still reaches the sink with its batch context intact.
    pub fn fallback(&self, batch: &LogBatch, index: usize) -> Value {
        json!({
            "batchSize": batch.messages.len(),
            "sequence": index,
            "agentSessionId": batch.session_id,
            "detailsTruncated": true,
        })
    }
}
