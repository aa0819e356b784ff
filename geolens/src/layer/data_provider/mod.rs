//! Data providers load overlay datasets by name.

use async_trait::async_trait;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::error::GeolensError;
use crate::layer::FeatureLayer;

mod url_dataset_provider;

pub use url_dataset_provider::UrlDatasetProvider;

/// Function that returns a URL for the given key.
pub trait UrlSource<Key: ?Sized>: (Fn(&Key) -> String) + MaybeSend + MaybeSync {}
impl<Key: ?Sized, T: Fn(&Key) -> String> UrlSource<Key> for T where T: MaybeSend + MaybeSync {}

/// Loads overlay datasets.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DatasetProvider: MaybeSend + MaybeSync {
    /// Loads and decodes the dataset with the given name.
    async fn load(&self, name: &str) -> Result<FeatureLayer, GeolensError>;
}
