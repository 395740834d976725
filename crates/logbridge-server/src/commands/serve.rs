use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use clap::Args;
use logbridge_config::AgentConfiguration;
use logbridge_core::plugin::PluginManager;
use logbridge_core::sink::LogEntrySink;
use logbridge_ingest::LogIngestPlugin;
use logbridge_sessions::SessionCorrelator;
use logbridge_sink::{ChannelLogSink, SinkWorker, DEFAULT_QUEUE_CAPACITY};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:8080", env = "LOGBRIDGE_ADDRESS")]
    pub address: String,

    /// Capacity of the sink queue
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY, env = "LOGBRIDGE_QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Idle TTL for session correlations, in seconds
    #[arg(long, default_value_t = 600, env = "LOGBRIDGE_SESSION_TTL_SECS")]
    pub session_ttl_secs: u64,

    /// Path to the agent configuration document
    #[arg(long, env = "LOGBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.serve())
    }

    async fn serve(self) -> anyhow::Result<()> {
        if let Some(path) = &self.config {
            let config = AgentConfiguration::load(path)?;
            info!(
                product = %config.publisher.product_name,
                application = %config.publisher.application_name,
                server = %config.server.server,
                "loaded agent configuration"
            );
        }

        let correlator = Arc::new(SessionCorrelator::new(Duration::from_secs(
            self.session_ttl_secs,
        )));

        let (sink, receiver) = ChannelLogSink::create_channel(self.queue_capacity);
        let _worker = SinkWorker::new(receiver).spawn();
        debug!(capacity = self.queue_capacity, "sink queue created");

        let mut plugin_manager = PluginManager::new();
        plugin_manager
            .service_context()
            .register_service(correlator);
        plugin_manager
            .service_context()
            .register_service::<dyn LogEntrySink>(Arc::new(sink));

        plugin_manager.register_plugin(Box::new(LogIngestPlugin::new()));
        plugin_manager.initialize_plugins().await?;

        let openapi = plugin_manager
            .get_unified_openapi()
            .map_err(|e| anyhow::anyhow!("Failed to build OpenAPI schema: {}", e))?;

        let app = plugin_manager
            .build_application()
            .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?
            .merge(openapi_router(openapi))
            .layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(&self.address).await?;
        info!("Log bridge listening on {}", self.address);

        axum::serve(listener, app).await?;
        info!("Log bridge server exited");
        Ok(())
    }
}

fn openapi_router(openapi: utoipa::openapi::OpenApi) -> Router {
    let doc = serde_json::to_value(&openapi).unwrap_or_default();
    Router::new().route(
        "/api-docs/openapi.json",
        get(move || {
            let doc = doc.clone();
            async move { Json(doc) }
        }),
    )
}
