use crate::utils::error::{PredictorError, Result, ServeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A single feature value: numeric, categorical or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Coerces a predicted label into an integer class.
    ///
    /// Numbers truncate toward zero, booleans map to 0/1 and strings must
    /// hold an integer literal.
    pub fn to_class_label(&self) -> std::result::Result<i64, PredictorError> {
        match self {
            Scalar::Bool(b) => Ok(i64::from(*b)),
            // i64::MAX as f64 rounds up to 2^63, hence the open upper bound
            Scalar::Number(n) if (i64::MIN as f64..i64::MAX as f64).contains(&n.trunc()) => {
                Ok(n.trunc() as i64)
            }
            Scalar::Number(n) => Err(PredictorError::Internal(format!(
                "predicted label {} does not fit an integer class",
                n
            ))),
            Scalar::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                PredictorError::Internal(format!("predicted label '{}' is not an integer", s))
            }),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

pub type FeatureMap = BTreeMap<String, Scalar>;

/// Column-oriented view over one or more rows of features.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularBatch {
    columns: Vec<String>,
    rows: Vec<Vec<Scalar>>,
}

impl TabularBatch {
    /// 由單筆特徵建立一列資料，欄位即為請求中的鍵
    pub fn single_row(features: &FeatureMap) -> Self {
        let columns = features.keys().cloned().collect();
        let row = features.values().cloned().collect();
        Self {
            columns,
            rows: vec![row],
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Scalar]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: FeatureMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub churn_pred: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub model_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub docs: String,
}

/// Where a model artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelUri {
    /// `runs:/<run_id>/<artifact_path>` on a tracking server
    Run {
        run_id: String,
        artifact_path: String,
    },
    Local(PathBuf),
}

impl FromStr for ModelUri {
    type Err = ServeError;

    fn from_str(raw: &str) -> Result<Self> {
        let uri = raw.trim();
        let invalid = |reason: &str| ServeError::InvalidModelUri {
            uri: raw.to_string(),
            reason: reason.to_string(),
        };

        if uri.is_empty() {
            return Err(invalid("URI is empty"));
        }

        if let Some(rest) = uri.strip_prefix("runs:/") {
            let rest = rest.trim_start_matches('/');
            let (run_id, artifact_path) = rest
                .split_once('/')
                .ok_or_else(|| invalid("expected runs:/<run_id>/<artifact_path>"))?;
            let artifact_path = artifact_path.trim_matches('/');
            if run_id.is_empty() || artifact_path.is_empty() {
                return Err(invalid("expected runs:/<run_id>/<artifact_path>"));
            }
            return Ok(ModelUri::Run {
                run_id: run_id.to_string(),
                artifact_path: artifact_path.to_string(),
            });
        }

        if uri.starts_with("file:") {
            return file_uri_to_path(uri)
                .map(ModelUri::Local)
                .map_err(|reason| invalid(reason.as_str()));
        }

        if let Some(scheme) = foreign_scheme(uri) {
            return Err(invalid(&format!("unsupported scheme '{}'", scheme)));
        }

        Ok(ModelUri::Local(PathBuf::from(uri)))
    }
}

/// `file:///abs` goes through URL parsing; `file:./rel` and `file:/abs` keep the path as written.
fn file_uri_to_path(uri: &str) -> std::result::Result<PathBuf, String> {
    let rest = &uri["file:".len()..];
    if !rest.starts_with("//") {
        if rest.is_empty() {
            return Err("file URI has no path".to_string());
        }
        return Ok(PathBuf::from(rest));
    }

    url::Url::parse(uri)
        .map_err(|e| e.to_string())?
        .to_file_path()
        .map_err(|_| "file URI must hold a local path".to_string())
}

/// Returns the scheme of a `scheme:/...` prefix, ignoring one-letter drive names.
fn foreign_scheme(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once(":/")?;
    let looks_like_scheme = scheme.len() > 1
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '+' || c == '.');
    looks_like_scheme.then_some(scheme)
}

/// Where `runs:/` URIs are resolved: a tracking server or an on-disk `mlruns` tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingLocation {
    Server(String),
    FileStore(PathBuf),
}

pub const DEFAULT_FILE_STORE: &str = "mlruns";

impl Default for TrackingLocation {
    fn default() -> Self {
        TrackingLocation::FileStore(PathBuf::from(DEFAULT_FILE_STORE))
    }
}

impl FromStr for TrackingLocation {
    type Err = ServeError;

    fn from_str(raw: &str) -> Result<Self> {
        let location = raw.trim();
        let invalid = |reason: String| ServeError::InvalidConfigValueError {
            field: "model.tracking_uri".to_string(),
            value: raw.to_string(),
            reason,
        };

        if location.is_empty() {
            return Err(invalid("tracking URI cannot be empty".to_string()));
        }
        if location.starts_with("http://") || location.starts_with("https://") {
            return Ok(TrackingLocation::Server(location.to_string()));
        }
        if location.starts_with("file:") {
            return file_uri_to_path(location)
                .map(TrackingLocation::FileStore)
                .map_err(invalid);
        }
        if let Some(scheme) = foreign_scheme(location) {
            return Err(invalid(format!("unsupported tracking scheme '{}'", scheme)));
        }

        Ok(TrackingLocation::FileStore(PathBuf::from(location)))
    }
}

impl fmt::Display for ModelUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelUri::Run {
                run_id,
                artifact_path,
            } => write!(f, "runs:/{}/{}", run_id, artifact_path),
            ModelUri::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
