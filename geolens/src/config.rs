//! Viewer configuration.

use geolens_types::geo::{GeoPoint2d, NewGeoPoint};
use serde::{Deserialize, Serialize};

use crate::error::GeolensError;
use crate::layer::data_provider::UrlDatasetProvider;
use crate::layer::symbol::{CirclePointSymbol, LineSymbol};
use crate::layer::{Attribution, TileLayer, TileLayerBuilder};

/// Configuration of a [`Viewer`](crate::viewer::Viewer).
///
/// Every field has a default, so a configuration can be given as a partial JSON object:
///
/// ```
/// use geolens::config::ViewerConfig;
///
/// let config = ViewerConfig::from_json(r#"{ "datasets": ["roads.geojson"], "zoom_snap": 1 }"#)?;
/// assert_eq!(config.datasets, vec!["roads.geojson"]);
/// assert_eq!(config.zoom_snap, 1.0);
/// assert_eq!(config.home.zoom, 8.0);
/// # Ok::<(), geolens::error::GeolensError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// View the map starts with and returns to with the home action.
    pub home: HomeView,
    /// Zoom levels are rounded down to a multiple of this value when fitting bounds.
    pub zoom_snap: f64,
    /// Maximum zoom level of the map.
    pub max_zoom: f64,
    /// Street base layer, shown on start.
    pub street: TileSourceConfig,
    /// Satellite base layer.
    pub satellite: TileSourceConfig,
    /// URL template of overlay datasets, `{name}` is replaced with the dataset name.
    pub dataset_url: String,
    /// Names of the overlay datasets that can be selected.
    pub datasets: Vec<String>,
    /// Selector value that loads all datasets at once.
    pub all_datasets_value: String,
    /// Styles of the measurement tool shapes.
    pub measure: MeasureStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            home: HomeView::default(),
            zoom_snap: 0.5,
            max_zoom: 20.0,
            street: TileSourceConfig::street(),
            satellite: TileSourceConfig::satellite(),
            dataset_url: "geojson/{name}".to_string(),
            datasets: vec![],
            all_datasets_value: "show-all".to_string(),
            measure: MeasureStyle::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses the configuration from a JSON string. Missing fields get default values.
    pub fn from_json(json: &str) -> Result<Self, GeolensError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Creates a provider that loads datasets from [`ViewerConfig::dataset_url`].
    pub fn dataset_provider(&self) -> Result<UrlDatasetProvider, GeolensError> {
        UrlDatasetProvider::from_template(&self.dataset_url)
    }
}

/// Center and zoom of the home view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeView {
    /// Latitude of the center.
    pub lat: f64,
    /// Longitude of the center.
    pub lon: f64,
    /// Zoom level.
    pub zoom: f64,
}

impl HomeView {
    /// Center of the view.
    pub fn center(&self) -> GeoPoint2d {
        GeoPoint2d::latlon(self.lat, self.lon)
    }
}

impl Default for HomeView {
    fn default() -> Self {
        Self {
            lat: 40.0,
            lon: 27.0,
            zoom: 8.0,
        }
    }
}

/// Source of a tile base layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSourceConfig {
    /// URL template with `{z}`, `{x}`, `{y}` and optional `{s}` placeholders.
    pub url_template: String,
    /// Values for the `{s}` placeholder.
    #[serde(default)]
    pub subdomains: Vec<String>,
    /// Maximum zoom level the source provides.
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    /// Credits for the imagery.
    #[serde(default)]
    pub attribution: Option<Attribution>,
}

fn default_max_zoom() -> u8 {
    TileLayerBuilder::DEFAULT_MAX_ZOOM
}

impl TileSourceConfig {
    /// Open Street Map tiles.
    pub fn street() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".into(), "b".into(), "c".into()],
            max_zoom: TileLayerBuilder::DEFAULT_MAX_ZOOM,
            attribution: Some(Attribution::new(
                "© OpenStreetMap".to_string(),
                Some("https://www.openstreetmap.org/copyright".to_string()),
            )),
        }
    }

    /// Google satellite imagery.
    pub fn satellite() -> Self {
        Self {
            url_template: "https://{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}".to_string(),
            subdomains: vec!["mt0".into(), "mt1".into(), "mt2".into(), "mt3".into()],
            max_zoom: 20,
            attribution: Some(Attribution::new("© Google".to_string(), None)),
        }
    }

    /// Builds the tile layer. Fails if the URL template is invalid.
    pub fn to_layer(&self) -> Result<TileLayer, GeolensError> {
        let mut builder = TileLayerBuilder::new_rest(self.url_template.clone())
            .with_subdomains(self.subdomains.iter().cloned())
            .with_max_zoom(self.max_zoom);
        if let Some(attribution) = &self.attribution {
            builder = builder.with_attribution(
                attribution.get_text().to_string(),
                attribution.get_url().map(str::to_string),
            );
        }

        builder.build()
    }
}

/// Styles of the measurement markers and line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureStyle {
    /// Marker drawn at each measured point.
    pub marker: CirclePointSymbol,
    /// Line connecting the measured points.
    pub line: LineSymbol,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use insta::assert_compact_debug_snapshot;

    use super::*;
    use crate::layer::TileIndex;
    use crate::Color;

    #[test]
    fn default_tile_sources_are_valid() {
        let config = ViewerConfig::default();
        let street = config.street.to_layer().unwrap();
        let satellite = config.satellite.to_layer().unwrap();

        assert_eq!(street.max_zoom(), TileLayerBuilder::DEFAULT_MAX_ZOOM);
        assert_eq!(
            satellite.tile_url(TileIndex::new(1, 2, 3)).unwrap(),
            "https://mt3.google.com/vt/lyrs=s&x=1&y=2&z=3"
        );
    }

    #[test]
    fn partial_json() {
        let config = ViewerConfig::from_json(
            r##"{
                "home": { "lat": 41.0, "lon": 29.0, "zoom": 10 },
                "satellite": { "url_template": "https://tiles.example.com/{z}/{x}/{y}.jpg" },
                "measure": { "line": { "color": "#0000ff", "width": 2, "opacity": 1 } }
            }"##,
        )
        .unwrap();

        assert_eq!(config.home.center(), GeoPoint2d::latlon(41.0, 29.0));
        assert_eq!(config.satellite.max_zoom, TileLayerBuilder::DEFAULT_MAX_ZOOM);
        assert!(config.satellite.subdomains.is_empty());
        assert_eq!(config.street, TileSourceConfig::street());
        assert_eq!(config.measure.line.color, Color::rgba(0, 0, 255, 255));
        assert_eq!(config.measure.marker, CirclePointSymbol::default());
        assert_eq!(config.all_datasets_value, "show-all");
    }

    #[test]
    fn invalid_json_is_configuration_error() {
        assert_matches!(
            ViewerConfig::from_json(r#"{ "zoom_snap": "half" }"#),
            Err(GeolensError::Configuration(_))
        );
    }

    #[test]
    fn invalid_template_fails_layer_creation() {
        let source = TileSourceConfig {
            url_template: "https://tiles.example.com/{z}/{x}.png".to_string(),
            subdomains: vec![],
            max_zoom: 18,
            attribution: None,
        };
        assert_compact_debug_snapshot!(
            source.to_layer(),
            @r#"Err(Configuration("tile url template https://tiles.example.com/{z}/{x}.png has no {y} placeholder"))"#
        );
    }
}
