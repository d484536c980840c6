//! churn-serve - HTTP wrapper around a registered churn model
//!
//! The model is resolved once at startup from `MODEL_URI`
//! (`runs:/<run_id>/model` on a tracking server, or a local path) and
//! served through `/health`, `/` and `/predict`.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileRunStore, LocalModelStore, RunStore, TrackingServerStore, UriModelStore};
pub use config::Settings;
pub use crate::core::loader::ModelLoader;
pub use crate::core::service::{PredictionService, ServiceState};
pub use utils::error::{PredictorError, Result, ServeError};
