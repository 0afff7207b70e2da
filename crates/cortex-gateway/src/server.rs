// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the API surface.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use cortex_core::error::CortexError;
use cortex_generation::ChatStreamer;
use cortex_graph::{CorrectionDispatcher, GraphView};
use cortex_hydration::Synthesizer;
use cortex_ingest::Orchestrator;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Session ingestion and job polling.
    pub orchestrator: Arc<Orchestrator>,
    /// Knowledge compilation synthesis for hydration reads.
    pub synthesizer: Arc<Synthesizer>,
    /// Graph projection reads for visualization.
    pub graph_view: Arc<GraphView>,
    /// Memory correction dispatch.
    pub corrections: Arc<CorrectionDispatcher>,
    /// Streaming chat completion adapter.
    pub chat: Arc<ChatStreamer>,
    /// Authentication configuration.
    pub auth: AuthConfig,
}

/// Gateway server configuration (mirrors the server section of cortex-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the gateway router.
///
/// `/health` is public; every other route sits behind the `x-api-secret`
/// middleware.
pub fn router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new().route("/health", get(handlers::health));

    let api_routes = Router::new()
        .route("/ingest", post(handlers::ingest_session))
        .route("/ingest/{job_id}", get(handlers::ingest_status))
        .route("/hydrate", post(handlers::hydrate_user))
        .route("/v1/chat/completions", post(handlers::chat_completions))
        .route("/v1/graph/correction", post(handlers::correct_memory))
        .route("/v1/graph/{group_id}", get(handlers::get_graph))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Starts the gateway HTTP server.
///
/// Binds to the configured host:port and serves:
/// - GET  /health (public)
/// - POST /ingest, GET /ingest/{job_id}
/// - POST /hydrate
/// - POST /v1/chat/completions (SSE)
/// - GET  /v1/graph/{group_id}, POST /v1/graph/correction
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), CortexError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CortexError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("cortex gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CortexError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received, draining connections"),
        Err(err) => {
            tracing::error!(error = %err, "failed to install shutdown signal handler");
            std::future::pending::<()>().await;
        }
    }
}
