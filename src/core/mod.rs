pub mod classifier;
pub mod loader;
pub mod service;

pub use crate::domain::model::{FeatureMap, ModelUri, PredictRequest, PredictResponse, Scalar, TabularBatch};
pub use crate::domain::ports::{ModelStore, Predictor};
pub use crate::utils::error::Result;
