//! HTTP server setup and configuration.

use axum::{
    routing::{get, post},
    Router,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::config::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub http_client: Client,
    pub config: Arc<Config>,
}

/// Create the axum router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Relay endpoint; non-POST methods fall back to a 405 JSON error
        .route(
            "/api/generate",
            post(handlers::generate).fallback(handlers::method_not_allowed),
        )
        // Diagnostics
        .route("/health", get(handlers::health))
        .route("/endpoints", get(handlers::list_endpoints))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let listen_addr = config.server.listen.clone();

    // Generation calls can run long; the connect timeout stays short so a
    // dead upstream fails fast.
    let http_client = Client::builder()
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(10))
        .build()?;

    let state = AppState {
        http_client,
        config: Arc::new(config),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(address = %listen_addr, "Starting gembridge relay server");

    axum::serve(listener, app).await?;

    Ok(())
}
