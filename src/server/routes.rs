//! Route definitions

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{docs_page, health, openapi, predict, root, AppState};

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        // Documentation
        .route("/docs", get(docs_page))
        .route("/openapi.json", get(openapi))
}
