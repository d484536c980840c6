use crate::core::loader::ModelLoader;
use crate::domain::model::{
    HealthStatus, PredictRequest, PredictResponse, ServiceInfo, TabularBatch,
};
use crate::domain::ports::Predictor;
use crate::utils::error::{PredictorError, Result, ServeError};
use std::sync::Arc;

pub const SERVICE_MESSAGE: &str = "Churn MLOps API is running";
pub const DOCS_PATH: &str = "/docs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Unloaded,
    Loaded,
}

/// Holds the configured model URI and, once activated, the predictor.
///
/// The predictor is fixed at construction; every request reads the same handle.
#[derive(Clone)]
pub struct PredictionService {
    model_uri: Option<String>,
    predictor: Option<Arc<dyn Predictor>>,
}

impl PredictionService {
    pub fn new(model_uri: Option<String>) -> Self {
        Self {
            model_uri,
            predictor: None,
        }
    }

    pub fn with_predictor(model_uri: Option<String>, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            model_uri,
            predictor: Some(predictor),
        }
    }

    /// 啟動時載入模型；URI 有設定但載入失敗時回傳錯誤
    pub async fn activate(model_uri: Option<String>, loader: &ModelLoader) -> Result<Self> {
        let predictor = loader.load(model_uri.as_deref()).await?;
        Ok(Self {
            model_uri,
            predictor,
        })
    }

    pub fn state(&self) -> ServiceState {
        match self.predictor {
            Some(_) => ServiceState::Loaded,
            None => ServiceState::Unloaded,
        }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            model_loaded: self.predictor.is_some(),
            model_uri: self.model_uri.clone(),
        }
    }

    pub fn info(&self) -> ServiceInfo {
        ServiceInfo {
            message: SERVICE_MESSAGE.to_string(),
            docs: DOCS_PATH.to_string(),
        }
    }

    pub fn predict(&self, request: &PredictRequest) -> Result<PredictResponse> {
        let predictor = self.predictor.as_ref().ok_or(ServeError::ModelUnavailable)?;

        if let Some(schema) = predictor.input_schema() {
            let missing: Vec<&str> = schema
                .iter()
                .filter(|column| !request.features.contains_key(column.as_str()))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(ServeError::InvalidInput {
                    message: format!("missing features: {}", missing.join(", ")),
                });
            }
        }

        let batch = TabularBatch::single_row(&request.features);
        let labels = predictor.predict(&batch)?;
        let first = labels.first().ok_or_else(|| {
            PredictorError::Internal("predictor returned no labels".to_string())
        })?;
        let churn_pred = first.to_class_label()?;

        tracing::debug!("Predicted churn={} for {} features", churn_pred, batch.columns().len());
        Ok(PredictResponse { churn_pred })
    }
}
