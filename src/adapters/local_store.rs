use crate::core::classifier::{ModelArtifact, ARTIFACT_FILE_NAME};
use crate::domain::model::ModelUri;
use crate::domain::ports::{ModelStore, Predictor};
use crate::utils::error::{Result, ServeError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads model artifacts from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalModelStore {
    base_path: Option<PathBuf>,
}

impl LocalModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative paths are resolved against `base_path` instead of the working directory.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: Some(base_path.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub async fn load_path(&self, path: &Path) -> Result<Arc<dyn Predictor>> {
        let full_path = self.resolve(path);
        let metadata = match tokio::fs::metadata(&full_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ServeError::ModelNotFound {
                    uri: full_path.display().to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        // 目錄形式的 artifact 需要包含 model.json
        let artifact_path = if metadata.is_dir() {
            full_path.join(ARTIFACT_FILE_NAME)
        } else {
            full_path
        };

        tracing::debug!("Reading model artifact from {}", artifact_path.display());
        let bytes = match tokio::fs::read(&artifact_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ServeError::ModelNotFound {
                    uri: artifact_path.display().to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        ModelArtifact::from_json_slice(&bytes)?.into_predictor()
    }
}

#[async_trait]
impl ModelStore for LocalModelStore {
    async fn load(&self, uri: &ModelUri) -> Result<Arc<dyn Predictor>> {
        match uri {
            ModelUri::Local(path) => self.load_path(path).await,
            other => Err(ServeError::InvalidModelUri {
                uri: other.to_string(),
                reason: "the local store only serves filesystem paths".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONSTANT: &str = r#"{"flavor":"constant","label":0}"#;

    #[tokio::test]
    async fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(ARTIFACT_FILE_NAME), CONSTANT).unwrap();

        let store = LocalModelStore::new();
        let uri = ModelUri::Local(dir.path().to_path_buf());
        assert!(store.load(&uri).await.is_ok());
    }

    #[tokio::test]
    async fn test_relative_path_uses_base() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("model")).unwrap();
        std::fs::write(dir.path().join("model").join(ARTIFACT_FILE_NAME), CONSTANT).unwrap();

        let store = LocalModelStore::with_base_path(dir.path());
        assert!(store.load_path(Path::new("model")).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let store = LocalModelStore::new();

        let err = store.load_path(dir.path()).await.err().unwrap();
        assert!(matches!(err, ServeError::ModelNotFound { .. }));

        let err = store
            .load_path(&dir.path().join("does-not-exist"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ServeError::ModelNotFound { .. }));
    }

    #[tokio::test]
    async fn test_run_uri_is_rejected() {
        let uri = ModelUri::Run {
            run_id: "abc".to_string(),
            artifact_path: "model".to_string(),
        };
        let err = LocalModelStore::new().load(&uri).await.err().unwrap();
        assert!(matches!(err, ServeError::InvalidModelUri { .. }));
    }
}
