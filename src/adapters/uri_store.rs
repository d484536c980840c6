use crate::adapters::{FileRunStore, LocalModelStore, TrackingServerStore};
use crate::domain::model::{ModelUri, TrackingLocation};
use crate::domain::ports::{ModelStore, Predictor};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Where `runs:/` URIs are resolved.
#[derive(Debug, Clone)]
pub enum RunStore {
    Server(TrackingServerStore),
    Files(FileRunStore),
}

impl Default for RunStore {
    fn default() -> Self {
        RunStore::Files(FileRunStore::default())
    }
}

impl From<TrackingLocation> for RunStore {
    fn from(location: TrackingLocation) -> Self {
        match location {
            TrackingLocation::Server(base_url) => {
                RunStore::Server(TrackingServerStore::new(base_url))
            }
            TrackingLocation::FileStore(root) => RunStore::Files(FileRunStore::new(root)),
        }
    }
}

#[async_trait]
impl ModelStore for RunStore {
    async fn load(&self, uri: &ModelUri) -> Result<Arc<dyn Predictor>> {
        match self {
            RunStore::Server(store) => store.load(uri).await,
            RunStore::Files(store) => store.load(uri).await,
        }
    }
}

/// Dispatches each URI to the store that understands its scheme.
#[derive(Debug, Clone, Default)]
pub struct UriModelStore {
    local: LocalModelStore,
    runs: RunStore,
}

impl UriModelStore {
    pub fn new(local: LocalModelStore, runs: RunStore) -> Self {
        Self { local, runs }
    }

    /// Without a tracking URI, runs are looked up in `./mlruns`.
    pub fn from_tracking_uri(tracking_uri: Option<&str>) -> Result<Self> {
        let location = match tracking_uri {
            Some(raw) => raw.parse::<TrackingLocation>()?,
            None => TrackingLocation::default(),
        };
        tracing::debug!("Resolving runs:/ URIs against {:?}", location);
        Ok(Self::new(LocalModelStore::new(), location.into()))
    }
}

#[async_trait]
impl ModelStore for UriModelStore {
    async fn load(&self, uri: &ModelUri) -> Result<Arc<dyn Predictor>> {
        match uri {
            ModelUri::Run { .. } => self.runs.load(uri).await,
            ModelUri::Local(_) => self.local.load(uri).await,
        }
    }
}
