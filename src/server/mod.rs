//! HTTP surface of the prediction service.

mod docs;
mod handlers;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::core::service::PredictionService;

pub use handlers::{AppState, ErrorResponse};
pub use routes::api_routes;

/// Build the application router around an already activated service.
pub fn router(service: PredictionService) -> Router {
    let state = Arc::new(AppState::new(service));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start(service: PredictionService, config: &ServerConfig) -> Result<()> {
    let app = router(service);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /        - Service description");
    tracing::info!("  GET  /health  - Health check");
    tracing::info!("  POST /predict - Churn prediction");
    tracing::info!("  GET  /docs    - API documentation");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
