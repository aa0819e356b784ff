use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::GeolensError;
use crate::layer::data_provider::{DatasetProvider, UrlSource};
use crate::layer::FeatureLayer;
use crate::platform::{PlatformService, PlatformServiceImpl};

/// Loads GeoJSON datasets over HTTP.
///
/// ```
/// use geolens::layer::data_provider::UrlDatasetProvider;
///
/// let provider = UrlDatasetProvider::from_template("geojson/{name}")?;
/// assert_eq!(provider.url("roads.geojson"), "geojson/roads.geojson");
/// # Ok::<(), geolens::error::GeolensError>(())
/// ```
pub struct UrlDatasetProvider {
    url_source: Box<dyn UrlSource<str>>,
    platform_service: PlatformServiceImpl,
}

impl UrlDatasetProvider {
    /// Creates a provider that requests datasets from the URLs returned by `url_source`.
    pub fn new(url_source: impl UrlSource<str> + 'static) -> Self {
        Self {
            url_source: Box::new(url_source),
            platform_service: PlatformServiceImpl::new(),
        }
    }

    /// Creates a provider with a URL template where `{name}` is replaced by the dataset name.
    ///
    /// Fails if the template contains any other placeholder.
    pub fn from_template(template: impl Into<String>) -> Result<Self, GeolensError> {
        let template = template.into();
        format_url(&template, "").map_err(|err| {
            GeolensError::Configuration(format!("invalid dataset url template {template}: {err}"))
        })?;

        Ok(Self::new(move |name: &str| {
            format_url(&template, name).unwrap_or_else(|_| template.replace("{name}", name))
        }))
    }

    /// URL the dataset with the given name is loaded from.
    pub fn url(&self, name: &str) -> String {
        (self.url_source)(name)
    }
}

impl std::fmt::Debug for UrlDatasetProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlDatasetProvider").finish_non_exhaustive()
    }
}

fn format_url(template: &str, name: &str) -> Result<String, strfmt::FmtError> {
    let vars = HashMap::from([("name".to_string(), name.to_string())]);
    strfmt::strfmt(template, &vars)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DatasetProvider for UrlDatasetProvider {
    async fn load(&self, name: &str) -> Result<FeatureLayer, GeolensError> {
        let url = self.url(name);
        log::debug!("Loading dataset {name} from {url}");

        let bytes = self.platform_service.load_bytes_from_url(&url).await?;
        let layer = FeatureLayer::from_slice(name, &bytes)?;

        log::debug!(
            "Dataset {name} loaded with {} features",
            layer.feature_count()
        );

        Ok(layer)
    }
}
