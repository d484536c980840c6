use crate::domain::model::ModelUri;
use crate::domain::ports::{ModelStore, Predictor};
use crate::utils::error::{Result, ServeError};
use std::sync::Arc;
use std::time::Duration;

pub const EXAMPLE_MODEL_URI: &str = "runs:/<run_id>/model";

/// Resolves the configured model URI once, at startup.
pub struct ModelLoader {
    store: Arc<dyn ModelStore>,
    timeout: Option<Duration>,
}

impl ModelLoader {
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Loads the predictor named by `model_uri`.
    ///
    /// A missing or blank URI is not an error: the service starts without a
    /// model and reports itself as unloaded. A URI that is present but cannot
    /// be resolved is always an error.
    pub async fn load(&self, model_uri: Option<&str>) -> Result<Option<Arc<dyn Predictor>>> {
        let raw = match model_uri.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                tracing::warn!("⚠️ MODEL_URI not set. Example: {}", EXAMPLE_MODEL_URI);
                return Ok(None);
            }
        };

        let uri: ModelUri = raw.parse()?;
        tracing::info!("Loading model from: {}", uri);

        let predictor = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.store.load(&uri))
                .await
                .map_err(|_| ServeError::LoadTimeout {
                    uri: raw.to_string(),
                    seconds: timeout.as_secs(),
                })??,
            None => self.store.load(&uri).await?,
        };

        tracing::info!("✅ Loaded model from: {}", raw);
        Ok(Some(predictor))
    }
}
