//! Model artifacts understood by the service.
//!
//! A model directory holds a `model.json` document whose `flavor` selects
//! the predictor implementation.

use crate::domain::model::{Scalar, TabularBatch};
use crate::domain::ports::Predictor;
use crate::utils::error::{PredictorError, Result, ServeError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

pub const ARTIFACT_FILE_NAME: &str = "model.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flavor", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
    /// Baseline model that always predicts the same class.
    Constant { label: i64 },
}

impl ModelArtifact {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ServeError::InvalidArtifact {
            message: format!("{} is not a valid model document: {}", ARTIFACT_FILE_NAME, e),
        })
    }

    /// 驗證內容後轉成可用的預測器
    pub fn into_predictor(self) -> Result<Arc<dyn Predictor>> {
        match self {
            ModelArtifact::LogisticRegression(model) => {
                model.validate_artifact()?;
                Ok(Arc::new(LinearChurnModel::new(model)))
            }
            ModelArtifact::Constant { label } => Ok(Arc::new(ConstantModel { label })),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub features: Vec<FeatureSpec>,
}

fn default_threshold() -> f64 {
    0.5
}

fn unit_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureSpec {
    Numeric {
        name: String,
        weight: f64,
        #[serde(default)]
        mean: f64,
        #[serde(default = "unit_scale")]
        scale: f64,
    },
    Categorical {
        name: String,
        weights: BTreeMap<String, f64>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Ignore,
    Error,
}

impl FeatureSpec {
    pub fn name(&self) -> &str {
        match self {
            FeatureSpec::Numeric { name, .. } | FeatureSpec::Categorical { name, .. } => name,
        }
    }

    fn contribution(&self, value: &Scalar) -> std::result::Result<f64, PredictorError> {
        match self {
            FeatureSpec::Numeric {
                name,
                weight,
                mean,
                scale,
            } => {
                let x = match value {
                    Scalar::Number(n) => *n,
                    Scalar::Bool(b) => f64::from(u8::from(*b)),
                    Scalar::Text(_) => {
                        return Err(PredictorError::TypeMismatch {
                            feature: name.clone(),
                            expected: "numeric".to_string(),
                        })
                    }
                };
                Ok(weight * (x - mean) / scale)
            }
            FeatureSpec::Categorical {
                name,
                weights,
                handle_unknown,
            } => {
                if let Scalar::Number(n) = value {
                    if n.fract() != 0.0 {
                        return Err(PredictorError::TypeMismatch {
                            feature: name.clone(),
                            expected: "categorical".to_string(),
                        });
                    }
                }
                let category = value.to_string();
                match (weights.get(&category), handle_unknown) {
                    (Some(w), _) => Ok(*w),
                    (None, HandleUnknown::Ignore) => Ok(0.0),
                    (None, HandleUnknown::Error) => Err(PredictorError::UnknownCategory {
                        feature: name.clone(),
                        value: category,
                    }),
                }
            }
        }
    }
}

impl LogisticRegression {
    fn validate_artifact(&self) -> Result<()> {
        let invalid = |message: String| Err(ServeError::InvalidArtifact { message });

        if !(0.0..=1.0).contains(&self.threshold) {
            return invalid(format!("threshold {} must be within [0, 1]", self.threshold));
        }
        if !self.intercept.is_finite() {
            return invalid("intercept must be finite".to_string());
        }

        let mut seen = HashSet::new();
        for spec in &self.features {
            if !seen.insert(spec.name()) {
                return invalid(format!("feature '{}' is declared twice", spec.name()));
            }
            if let FeatureSpec::Numeric { name, scale, .. } = spec {
                if *scale == 0.0 || !scale.is_finite() {
                    return invalid(format!("feature '{}' has an unusable scale", name));
                }
            }
        }
        Ok(())
    }
}

/// Logistic regression over numeric and one-hot encoded categorical features.
#[derive(Debug)]
pub struct LinearChurnModel {
    model: LogisticRegression,
    schema: Vec<String>,
}

impl LinearChurnModel {
    pub fn new(model: LogisticRegression) -> Self {
        let schema = model.features.iter().map(|f| f.name().to_string()).collect();
        Self { model, schema }
    }

    pub fn probability(
        &self,
        batch: &TabularBatch,
        row: &[Scalar],
    ) -> std::result::Result<f64, PredictorError> {
        let mut logit = self.model.intercept;
        for spec in &self.model.features {
            let idx = batch
                .column_index(spec.name())
                .ok_or_else(|| PredictorError::MissingFeature(spec.name().to_string()))?;
            logit += spec.contribution(&row[idx])?;
            if !logit.is_finite() {
                return Err(PredictorError::OutOfRange {
                    feature: spec.name().to_string(),
                });
            }
        }
        Ok(1.0 / (1.0 + (-logit).exp()))
    }
}

impl Predictor for LinearChurnModel {
    fn predict(&self, batch: &TabularBatch) -> std::result::Result<Vec<Scalar>, PredictorError> {
        batch
            .rows()
            .map(|row| {
                let p = self.probability(batch, row)?;
                let label = if p >= self.model.threshold { 1.0 } else { 0.0 };
                Ok(Scalar::Number(label))
            })
            .collect()
    }

    fn input_schema(&self) -> Option<&[String]> {
        Some(&self.schema)
    }
}

#[derive(Debug)]
pub struct ConstantModel {
    label: i64,
}

impl Predictor for ConstantModel {
    fn predict(&self, batch: &TabularBatch) -> std::result::Result<Vec<Scalar>, PredictorError> {
        Ok(vec![Scalar::Number(self.label as f64); batch.len()])
    }
}
