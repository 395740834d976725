//! HTTP surface for agent log submission.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use logbridge_core::problemdetails::Problem;
use logbridge_core::{RequestContext, HOST_SESSION_ID};
use tracing::debug;
use utoipa::OpenApi;

use crate::error::IngestError;
use crate::services::LogIngestionService;
use crate::types::{BatchAck, LogBatch, LogMessage, RawException, RawSourceInfo};

/// Header the host web tier stamps with its authoritative session id when
/// it fronts the bridge endpoint.
pub const HOST_SESSION_HEADER: &str = "x-host-session-id";

/// Shared state for ingestion handlers
pub struct BridgeState {
    pub ingestion: Arc<LogIngestionService>,
}

impl BridgeState {
    pub fn new(ingestion: Arc<LogIngestionService>) -> Self {
        Self { ingestion }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(submit_log_batch),
    components(schemas(
        LogBatch,
        LogMessage,
        RawSourceInfo,
        RawException,
        BatchAck,
        logbridge_core::entry::Severity,
        logbridge_core::ProblemDetails
    )),
    info(
        title = "Log Bridge API",
        description = "Ingestion endpoint for browser agent diagnostic log messages",
        version = "1.0.0"
    ),
    tags(
        (name = "Log Bridge", description = "Agent log batch submission")
    )
)]
pub struct BridgeApiDoc;

/// Submit a batch of agent log messages
#[utoipa::path(
    post,
    path = "/_bridge/log",
    request_body = LogBatch,
    responses(
        (status = 200, description = "Batch processed", body = BatchAck),
        (status = 400, description = "Request body is not a valid log batch", body = logbridge_core::ProblemDetails),
    ),
    tag = "Log Bridge"
)]
async fn submit_log_batch(
    State(state): State<Arc<BridgeState>>,
    headers: HeaderMap,
    payload: Result<Json<LogBatch>, JsonRejection>,
) -> Result<impl IntoResponse, Problem> {
    let Json(batch) = payload.map_err(|e| {
        debug!("rejecting malformed log batch: {}", e);
        IngestError::MalformedBatch(e.body_text())
    })?;

    let ctx = RequestContext::anonymous();
    if let Some(host_id) = headers
        .get(HOST_SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        ctx.set(HOST_SESSION_ID, host_id);
    }

    let ack = state.ingestion.process_batch(&ctx, batch).await;
    Ok(Json(ack))
}

/// Configure ingestion routes
pub fn configure_routes() -> Router<Arc<BridgeState>> {
    Router::new().route("/_bridge/log", post(submit_log_batch))
}
