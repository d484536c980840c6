use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Model store request failed: {0}")]
    StoreError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid model URI '{uri}': {reason}")]
    InvalidModelUri { uri: String, reason: String },

    #[error("Model artifact not found: {uri}")]
    ModelNotFound { uri: String },

    #[error("Model store returned HTTP {status}: {message}")]
    StoreResponseError { status: u16, message: String },

    #[error("Invalid model artifact: {message}")]
    InvalidArtifact { message: String },

    #[error("Loading model '{uri}' timed out after {seconds}s")]
    LoadTimeout { uri: String, seconds: u64 },

    #[error("Model not loaded. Set MODEL_URI and restart.")]
    ModelUnavailable,

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Inference failed: {message}")]
    InferenceFailed { message: String },
}

/// Failures raised by a predictor while classifying rows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictorError {
    #[error("missing feature '{0}'")]
    MissingFeature(String),

    #[error("unknown category '{value}' for feature '{feature}'")]
    UnknownCategory { feature: String, value: String },

    #[error("feature '{feature}' expects a {expected} value")]
    TypeMismatch { feature: String, expected: String },

    #[error("feature '{feature}' is out of range for the model")]
    OutOfRange { feature: String },

    #[error("{0}")]
    Internal(String),
}

impl From<PredictorError> for ServeError {
    fn from(err: PredictorError) -> Self {
        match err {
            PredictorError::Internal(message) => ServeError::InferenceFailed { message },
            other => ServeError::InvalidInput {
                message: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    ModelStore,
    Request,
    Inference,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ServeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ServeError::ConfigError { .. }
            | ServeError::InvalidConfigValueError { .. }
            | ServeError::ConfigValidationError { .. }
            | ServeError::InvalidModelUri { .. } => ErrorCategory::Configuration,
            ServeError::StoreError(_)
            | ServeError::ModelNotFound { .. }
            | ServeError::StoreResponseError { .. }
            | ServeError::InvalidArtifact { .. }
            | ServeError::LoadTimeout { .. } => ErrorCategory::ModelStore,
            ServeError::ModelUnavailable | ServeError::InvalidInput { .. } => {
                ErrorCategory::Request
            }
            ServeError::InferenceFailed { .. } => ErrorCategory::Inference,
            ServeError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Request => ErrorSeverity::Low,
            ErrorCategory::ModelStore => match self {
                ServeError::StoreError(_) | ServeError::LoadTimeout { .. } => {
                    ErrorSeverity::Medium
                }
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Configuration | ErrorCategory::Inference => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ServeError::StoreError(_) => {
                "Check that the tracking server is reachable (MLFLOW_TRACKING_URI)"
            }
            ServeError::LoadTimeout { .. } => {
                "Retry the startup or raise the model load timeout"
            }
            ServeError::ModelNotFound { .. } => {
                "Verify the run id, artifact path and tracking store, e.g. runs:/<run_id>/model"
            }
            ServeError::InvalidModelUri { .. } => {
                "Use runs:/<run_id>/<artifact_path>, file:///path/to/model or a local path"
            }
            ServeError::StoreResponseError { .. } => {
                "Inspect the tracking server logs for the rejected request"
            }
            ServeError::InvalidArtifact { .. } => {
                "Re-export the model; model.json must describe a supported flavor"
            }
            ServeError::ConfigError { .. }
            | ServeError::InvalidConfigValueError { .. }
            | ServeError::ConfigValidationError { .. } => {
                "Review the command line flags, environment variables and config file"
            }
            ServeError::ModelUnavailable => "Set MODEL_URI and restart the service",
            ServeError::InvalidInput { .. } => {
                "Send every feature the model expects with the correct value type"
            }
            ServeError::InferenceFailed { .. } => "Check the service logs for the model failure",
            ServeError::IoError(_) => "Check file permissions on the model files",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::ModelStore => format!("Could not load the model: {}", self),
            ErrorCategory::Request => self.to_string(),
            ErrorCategory::Inference => "Prediction failed".to_string(),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predictor_error_classification() {
        let input: ServeError = PredictorError::MissingFeature("tenure".to_string()).into();
        assert!(matches!(input, ServeError::InvalidInput { .. }));
        assert_eq!(input.category(), ErrorCategory::Request);

        let internal: ServeError = PredictorError::Internal("nan logit".to_string()).into();
        assert!(matches!(internal, ServeError::InferenceFailed { .. }));
        assert_eq!(internal.user_friendly_message(), "Prediction failed");

        let range: ServeError = PredictorError::OutOfRange {
            feature: "tenure".to_string(),
        }
        .into();
        assert!(matches!(range, ServeError::InvalidInput { .. }));
    }

    #[test]
    fn test_severity_ordering() {
        let missing = ServeError::ModelNotFound {
            uri: "runs:/abc/model".to_string(),
        };
        assert_eq!(missing.severity(), ErrorSeverity::High);
        assert!(ServeError::ModelUnavailable.severity() < missing.severity());
    }
}
