use crate::domain::model::{ModelUri, Scalar, TabularBatch};
use crate::utils::error::{PredictorError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// A loaded model that classifies tabular rows, one label per row.
pub trait Predictor: Send + Sync {
    fn predict(&self, batch: &TabularBatch) -> std::result::Result<Vec<Scalar>, PredictorError>;

    /// Columns the model requires, when the artifact declares them.
    fn input_schema(&self) -> Option<&[String]> {
        None
    }
}

/// Resolves a model URI into a ready-to-use predictor.
#[async_trait]
pub trait ModelStore: Send + Sync {
    async fn load(&self, uri: &ModelUri) -> Result<Arc<dyn Predictor>>;
}
