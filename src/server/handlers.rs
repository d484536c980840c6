//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use super::docs;
use crate::core::service::PredictionService;
use crate::domain::model::{HealthStatus, PredictRequest, PredictResponse, ServiceInfo};
use crate::utils::error::ServeError;

/// Shared application state
pub struct AppState {
    pub service: PredictionService,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self { service }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServeError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let detail = match &self {
            ServeError::ModelUnavailable | ServeError::InvalidInput { .. } => self.to_string(),
            other => {
                // Internal detail stays in the logs.
                tracing::error!(
                    "Prediction failed: {} (Category: {:?}, Severity: {:?})",
                    other,
                    other.category(),
                    other.severity()
                );
                other.user_friendly_message()
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(state.service.health())
}

/// Service description
pub async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(state.service.info())
}

/// Single-row churn prediction
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!("Rejected predict body: {}", rejection.body_text());
            return (
                rejection.status(),
                Json(ErrorResponse {
                    detail: rejection.body_text(),
                }),
            )
                .into_response();
        }
    };

    match state.service.predict(&request) {
        Ok(response) => (StatusCode::OK, Json::<PredictResponse>(response)).into_response(),
        Err(e) => {
            if matches!(e, ServeError::ModelUnavailable | ServeError::InvalidInput { .. }) {
                tracing::warn!("Predict request refused: {}", e);
            }
            e.into_response()
        }
    }
}

/// Human-readable API documentation
pub async fn docs_page() -> Html<&'static str> {
    Html(docs::DOCS_HTML)
}

/// OpenAPI document
pub async fn openapi() -> Json<serde_json::Value> {
    Json(docs::openapi_document())
}
