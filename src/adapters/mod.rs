// Adapters layer: concrete model stores behind the `ModelStore` port.

pub mod file_run_store;
pub mod local_store;
pub mod tracking_store;
pub mod uri_store;

pub use file_run_store::FileRunStore;
pub use local_store::LocalModelStore;
pub use tracking_store::TrackingServerStore;
pub use uri_store::{RunStore, UriModelStore};
