//! Plugin wiring for the ingestion pipeline.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::Router;
use logbridge_core::plugin::{
    BridgePlugin, PluginContext, PluginError, ServiceRegistrationContext,
};
use logbridge_core::sink::LogEntrySink;
use logbridge_sessions::SessionCorrelator;
use tracing::debug;
use utoipa::openapi::OpenApi;
use utoipa::OpenApi as OpenApiTrait;

use crate::handlers::{configure_routes, BridgeApiDoc, BridgeState};
use crate::services::LogIngestionService;

/// Plugin exposing the agent log submission endpoint.
///
/// Requires a `SessionCorrelator` and a `dyn LogEntrySink` to be registered
/// before it initializes.
pub struct LogIngestPlugin;

impl LogIngestPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogIngestPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgePlugin for LogIngestPlugin {
    fn name(&self) -> &'static str {
        "log-ingest"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let correlator = context.require_service::<SessionCorrelator>();
            let sink = context.require_service::<dyn LogEntrySink>();

            let ingestion = Arc::new(LogIngestionService::new(correlator, sink));
            context.register_service(ingestion.clone());

            let state = Arc::new(BridgeState::new(ingestion));
            context.register_service(state);

            debug!("log ingest plugin services registered");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<Router> {
        let state = context.require_service::<BridgeState>();
        Some(configure_routes().with_state(state))
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<BridgeApiDoc as OpenApiTrait>::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plugin_name() {
        assert_eq!(LogIngestPlugin::new().name(), "log-ingest");
    }
}
