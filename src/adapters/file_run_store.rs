use crate::adapters::LocalModelStore;
use crate::domain::model::{ModelUri, DEFAULT_FILE_STORE};
use crate::domain::ports::{ModelStore, Predictor};
use crate::utils::error::{Result, ServeError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolves `runs:/` URIs against a file-backed tracking store laid out as
/// `<root>/<experiment_id>/<run_id>/artifacts/<artifact_path>`.
#[derive(Debug, Clone)]
pub struct FileRunStore {
    root: PathBuf,
    local: LocalModelStore,
}

impl Default for FileRunStore {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_STORE)
    }
}

impl FileRunStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            local: LocalModelStore::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 在每個 experiment 目錄底下找 run 的 artifact
    pub async fn find_run_artifact(
        &self,
        run_id: &str,
        artifact_path: &str,
    ) -> Result<Option<PathBuf>> {
        let mut experiments = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Tracking store {} does not exist", self.root.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = experiments.next_entry().await? {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let candidate = entry
                .path()
                .join(run_id)
                .join("artifacts")
                .join(artifact_path);
            if tokio::fs::try_exists(&candidate).await? {
                tracing::debug!("Found run {} at {}", run_id, candidate.display());
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ModelStore for FileRunStore {
    async fn load(&self, uri: &ModelUri) -> Result<Arc<dyn Predictor>> {
        match uri {
            ModelUri::Run {
                run_id,
                artifact_path,
            } => match self.find_run_artifact(run_id, artifact_path).await? {
                Some(path) => self.local.load_path(&path).await,
                None => Err(ServeError::ModelNotFound {
                    uri: format!("{} (tracking store {})", uri, self.root.display()),
                }),
            },
            other => Err(ServeError::InvalidModelUri {
                uri: other.to_string(),
                reason: "the file tracking store only serves runs:/ URIs".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::ARTIFACT_FILE_NAME;
    use tempfile::TempDir;

    fn run_uri(run_id: &str) -> ModelUri {
        ModelUri::Run {
            run_id: run_id.to_string(),
            artifact_path: "model".to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_found_under_any_experiment() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join(".trash")).unwrap();
        std::fs::create_dir_all(root.path().join("0")).unwrap();
        let model_dir = root.path().join("42/abc123/artifacts/model");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(
            model_dir.join(ARTIFACT_FILE_NAME),
            r#"{"flavor":"constant","label":1}"#,
        )
        .unwrap();

        let store = FileRunStore::new(root.path());
        let found = store.find_run_artifact("abc123", "model").await.unwrap();
        assert_eq!(found, Some(model_dir));
        assert!(store.load(&run_uri("abc123")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_run_is_not_found() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("0/other-run/artifacts/model")).unwrap();

        let err = FileRunStore::new(root.path())
            .load(&run_uri("abc123"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ServeError::ModelNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_root_is_not_found() {
        let root = TempDir::new().unwrap();
        let store = FileRunStore::new(root.path().join("mlruns"));

        let err = store.load(&run_uri("abc123")).await.err().unwrap();
        assert!(matches!(err, ServeError::ModelNotFound { .. }));
    }

    #[tokio::test]
    async fn test_local_uri_is_rejected() {
        let uri = ModelUri::Local(PathBuf::from("./model"));
        let err = FileRunStore::default().load(&uri).await.err().unwrap();
        assert!(matches!(err, ServeError::InvalidModelUri { .. }));
    }
}
