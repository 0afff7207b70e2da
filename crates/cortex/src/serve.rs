// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `cortex serve` command implementation.
//!
//! Builds the upstream clients (Neo4j store, Graphiti engine, Gemini
//! backend), wires them into the orchestration services, and starts the
//! gateway HTTP server.

use std::sync::Arc;

use tracing::info;

use cortex_config::CortexConfig;
use cortex_core::error::CortexError;
use cortex_core::gate::AdmissionGate;
use cortex_core::traits::{EnrichmentEngine, GenerationBackend, GraphStore};
use cortex_gateway::{start_server, AuthConfig, GatewayState, ServerConfig};
use cortex_gemini::GeminiClient;
use cortex_generation::ChatStreamer;
use cortex_graph::{CorrectionDispatcher, GraphView};
use cortex_graphiti::GraphitiClient;
use cortex_hydration::Synthesizer;
use cortex_ingest::{JobStore, Orchestrator};
use cortex_neo4j::Neo4jStore;

/// Runs the `cortex serve` command.
///
/// All upstream clients are built before the server binds, so missing
/// secrets are reported at startup. One admission gate is shared between
/// enrichment and generation; together they respect the configured
/// upstream concurrency limit.
pub async fn run_serve(config: CortexConfig) -> Result<(), CortexError> {
    init_tracing(&config.server.log_level);

    info!("starting cortex serve");

    let api_secret = config
        .server
        .api_secret
        .clone()
        .ok_or_else(|| CortexError::Config("server.api_secret is required to serve".to_string()))?;

    let store: Arc<dyn GraphStore> = Arc::new(Neo4jStore::new(&config.neo4j)?);
    let engine: Arc<dyn EnrichmentEngine> = Arc::new(GraphitiClient::new(&config.graphiti)?);
    let backend: Arc<dyn GenerationBackend> = Arc::new(GeminiClient::new(&config.gemini)?);
    let gate = AdmissionGate::new(config.limits.upstream_concurrency);

    let synthesizer = Arc::new(Synthesizer::new(Arc::clone(&store), &config.hydration));
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(JobStore::new()),
        Arc::clone(&engine),
        Arc::clone(&synthesizer),
        gate.clone(),
        config.graphiti.model.clone(),
        &config.ingest,
    ));
    let graph_view = Arc::new(GraphView::new(Arc::clone(&store)));
    let corrections = Arc::new(CorrectionDispatcher::new(Arc::clone(&engine), gate.clone()));
    let chat = Arc::new(ChatStreamer::new(
        backend,
        gate,
        config.gemini.default_model.clone(),
    ));

    let state = GatewayState {
        orchestrator,
        synthesizer,
        graph_view,
        corrections,
        chat,
        auth: AuthConfig { api_secret },
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    start_server(&server_config, state).await
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cortex={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
