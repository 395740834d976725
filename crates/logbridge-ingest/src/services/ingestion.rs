use std::sync::Arc;

use logbridge_core::entry::LogEntry;
use logbridge_core::sink::LogEntrySink;
use logbridge_core::{RequestContext, AGENT_SESSION_ID, HOST_SESSION_ID};
use logbridge_sessions::SessionCorrelator;
use tracing::{debug, warn};

use crate::services::{reconstruct_exception, resolve_location, DetailBlockBuilder};
use crate::types::{BatchAck, LogBatch};
use crate::SOURCE_APPLICATION;

/// Drives a log batch through the per-message transforms and into the sink.
///
/// Failure isolation is per message: a transform that cannot produce its
/// normal output substitutes a fallback value and the message is still
/// sunk; only a refused enqueue drops a message, and siblings always
/// continue. The batch itself never fails once it has deserialized.
pub struct LogIngestionService {
    correlator: Arc<SessionCorrelator>,
    sink: Arc<dyn LogEntrySink>,
    detail_builder: DetailBlockBuilder,
}

impl LogIngestionService {
    pub fn new(correlator: Arc<SessionCorrelator>, sink: Arc<dyn LogEntrySink>) -> Self {
        Self {
            correlator,
            sink,
            detail_builder: DetailBlockBuilder::default(),
        }
    }

    pub fn with_detail_builder(mut self, builder: DetailBlockBuilder) -> Self {
        self.detail_builder = builder;
        self
    }

    pub async fn process_batch(&self, ctx: &RequestContext, batch: LogBatch) -> BatchAck {
        ctx.set(AGENT_SESSION_ID, batch.session_id.clone());
        let session_id = self.correlator.resolve(ctx);
        // Downstream consumers read the effective id from the context.
        ctx.set(HOST_SESSION_ID, session_id.clone());

        let identity = ctx.identity_label();
        let mut accepted = 0;
        let mut dropped = 0;

        for (index, message) in batch.messages.iter().enumerate() {
            let location = resolve_location(message.source_info.as_ref());
            let exception = reconstruct_exception(message.exception.as_ref());

            let details = match self.detail_builder.build(&batch, index, message) {
                Ok(block) => block,
                Err(e) => {
                    warn!(
                        sequence = index,
                        category = %message.category,
                        "detail block build failed, using fallback: {}", e
                    );
                    self.detail_builder.fallback(&batch, index)
                }
            };

            let entry = LogEntry {
                severity: message.severity,
                source_application: SOURCE_APPLICATION,
                location,
                identity: identity.clone(),
                session_id: session_id.clone(),
                exception,
                details,
                category: message.category.clone(),
                caption: message.caption.clone(),
                description: message.description.clone(),
                parameters: message.parameters.clone(),
            };

            match self.sink.enqueue(entry).await {
                Ok(()) => accepted += 1,
                Err(e) => {
                    warn!(
                        sequence = index,
                        category = %message.category,
                        "sink refused entry: {}", e
                    );
                    dropped += 1;
                }
            }
        }

        debug!(
            accepted,
            dropped,
            session_id = %session_id,
            "processed log batch"
        );
        BatchAck { accepted, dropped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LogMessage, RawException, RawSourceInfo};
    use logbridge_core::entry::Severity;
    use logbridge_sessions::DEFAULT_IDLE_TTL;
    use logbridge_sink::RecordingSink;
    use std::collections::BTreeMap;

    fn message(caption: &str) -> LogMessage {
        LogMessage {
            severity: Severity::Warning,
            category: "app".to_string(),
            caption: caption.to_string(),
            description: "something happened".to_string(),
            parameters: Vec::new(),
            source_info: None,
            exception: None,
            extra: BTreeMap::new(),
        }
    }

    fn batch(session_id: &str, messages: Vec<LogMessage>) -> LogBatch {
        LogBatch {
            session_id: session_id.to_string(),
            messages,
        }
    }

    fn service(sink: Arc<RecordingSink>) -> LogIngestionService {
        let correlator = Arc::new(SessionCorrelator::new(DEFAULT_IDLE_TTL));
        LogIngestionService::new(correlator, sink)
    }

    #[tokio::test]
    async fn every_message_reaches_the_sink_in_order() {
        let sink = Arc::new(RecordingSink::new());
        let svc = service(sink.clone());
        let ctx = RequestContext::anonymous();

        let ack = svc
            .process_batch(
                &ctx,
                batch("a1", vec![message("one"), message("two"), message("three")]),
            )
            .await;

        assert_eq!(ack, BatchAck { accepted: 3, dropped: 0 });
        let captions: Vec<String> = sink.entries().into_iter().map(|e| e.caption).collect();
        assert_eq!(captions, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn empty_batch_is_success_with_no_sink_calls() {
        let sink = Arc::new(RecordingSink::new());
        let svc = service(sink.clone());
        let ctx = RequestContext::anonymous();

        let ack = svc.process_batch(&ctx, batch("a1", vec![])).await;
        assert_eq!(ack, BatchAck { accepted: 0, dropped: 0 });
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn entries_carry_the_resolved_session_id() {
        let sink = Arc::new(RecordingSink::new());
        let svc = service(sink.clone());

        let ctx = RequestContext::anonymous();
        ctx.set(HOST_SESSION_ID, "host-7");

        svc.process_batch(&ctx, batch("agent-7", vec![message("m")]))
            .await;

        assert_eq!(sink.entries()[0].session_id, "host-7");
        // Second request without the host id still correlates.
        let ctx2 = RequestContext::anonymous();
        svc.process_batch(&ctx2, batch("agent-7", vec![message("m")]))
            .await;
        assert_eq!(sink.entries()[1].session_id, "host-7");
    }

    #[tokio::test]
    async fn anonymous_batch_degrades_to_empty_session_id() {
        let sink = Arc::new(RecordingSink::new());
        let svc = service(sink.clone());
        let ctx = RequestContext::anonymous();

        let ack = svc.process_batch(&ctx, batch("", vec![message("m")])).await;
        assert_eq!(ack.accepted, 1);
        assert_eq!(sink.entries()[0].session_id, "");
        assert_eq!(sink.entries()[0].identity, "");
    }

    #[tokio::test]
    async fn empty_exception_payload_becomes_absent() {
        let sink = Arc::new(RecordingSink::new());
        let svc = service(sink.clone());
        let ctx = RequestContext::anonymous();

        let mut with_empty = message("empty-exc");
        with_empty.exception = Some(RawException {
            message: String::new(),
            stack_trace: String::new(),
        });
        let mut with_real = message("real-exc");
        with_real.exception = Some(RawException {
            message: "boom".to_string(),
            stack_trace: "at app.js:1:1".to_string(),
        });

        svc.process_batch(&ctx, batch("a1", vec![message("none"), with_empty, with_real]))
            .await;

        let entries = sink.entries();
        assert!(entries[0].exception.is_none());
        assert!(entries[1].exception.is_none());
        assert_eq!(entries[2].exception.as_ref().unwrap().message, "boom");
    }

    #[tokio::test]
    async fn bad_source_info_falls_back_to_unknown() {
        let sink = Arc::new(RecordingSink::new());
        let svc = service(sink.clone());
        let ctx = RequestContext::anonymous();

        let mut msg = message("bad-loc");
        msg.source_info = Some(RawSourceInfo {
            file: "app.js".to_string(),
            line: -1,
            column: -1,
            method: None,
        });

        let ack = svc.process_batch(&ctx, batch("a1", vec![msg])).await;
        assert_eq!(ack.accepted, 1);
        assert!(sink.entries()[0].location.is_unknown());
    }

    #[tokio::test]
    async fn oversized_details_get_the_fallback_block_and_siblings_continue() {
        let sink = Arc::new(RecordingSink::new());
        let correlator = Arc::new(SessionCorrelator::new(DEFAULT_IDLE_TTL));
        let svc = LogIngestionService::new(correlator, sink.clone())
            .with_detail_builder(DetailBlockBuilder::new(200));

        let mut oversized = message("two");
        oversized
            .extra
            .insert("blob".to_string(), serde_json::json!("x".repeat(500)));

        let ctx = RequestContext::anonymous();
        let ack = svc
            .process_batch(
                &ctx,
                batch("a1", vec![message("one"), oversized, message("three")]),
            )
            .await;

        assert_eq!(ack, BatchAck { accepted: 3, dropped: 0 });
        let entries = sink.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].details["detailsTruncated"], serde_json::json!(true));
        assert!(entries[0].details.get("detailsTruncated").is_none());
    }

    #[tokio::test]
    async fn sink_refusal_drops_only_that_message() {
        let sink = Arc::new(RecordingSink::failing_after(2));
        let svc = service(sink.clone());
        let ctx = RequestContext::anonymous();

        let ack = svc
            .process_batch(
                &ctx,
                batch("a1", vec![message("one"), message("two"), message("three")]),
            )
            .await;

        assert_eq!(ack, BatchAck { accepted: 2, dropped: 1 });
        assert_eq!(sink.len(), 2);
    }
}
