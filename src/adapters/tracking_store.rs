use crate::core::classifier::{ModelArtifact, ARTIFACT_FILE_NAME};
use crate::domain::model::ModelUri;
use crate::domain::ports::{ModelStore, Predictor};
use crate::utils::error::{Result, ServeError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;

/// Downloads run artifacts from an MLflow-compatible tracking server.
#[derive(Debug, Clone)]
pub struct TrackingServerStore {
    base_url: String,
    client: Client,
}

impl TrackingServerStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// 下載 run 底下的 model.json
    pub async fn fetch_artifact(&self, run_id: &str, artifact_path: &str) -> Result<Vec<u8>> {
        let endpoint = format!("{}/get-artifact", self.base_url);
        let path = format!("{}/{}", artifact_path, ARTIFACT_FILE_NAME);

        tracing::debug!("Requesting artifact {} of run {} from {}", path, run_id, endpoint);
        let response = self
            .client
            .get(&endpoint)
            .query(&[("path", path.as_str()), ("run_uuid", run_id)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Tracking server response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(ServeError::ModelNotFound {
                uri: format!("runs:/{}/{}", run_id, artifact_path),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServeError::StoreResponseError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ModelStore for TrackingServerStore {
    async fn load(&self, uri: &ModelUri) -> Result<Arc<dyn Predictor>> {
        match uri {
            ModelUri::Run {
                run_id,
                artifact_path,
            } => {
                let bytes = self.fetch_artifact(run_id, artifact_path).await?;
                ModelArtifact::from_json_slice(&bytes)?.into_predictor()
            }
            other => Err(ServeError::InvalidModelUri {
                uri: other.to_string(),
                reason: "the tracking server only serves runs:/ URIs".to_string(),
            }),
        }
    }
}
