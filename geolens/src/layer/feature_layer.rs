//! GeoJSON overlay layers.

use std::any::Any;

use geojson::GeoJson;
use geolens_types::geo::GeoRect;
use geolens_types::geojson::GeoBounds;

use crate::error::GeolensError;
use crate::layer::Layer;

/// Layer displaying the content of a GeoJSON document.
///
/// The bounds of the document are calculated once on creation, so that the map can be fitted
/// to the layer without walking the geometries again.
#[derive(Debug, Clone)]
pub struct FeatureLayer {
    name: String,
    geojson: GeoJson,
    bounds: Option<GeoRect>,
}

impl FeatureLayer {
    /// Creates a new layer. Fails if the document contains positions with less than two
    /// coordinates.
    pub fn new(name: impl Into<String>, geojson: GeoJson) -> Result<Self, GeolensError> {
        let bounds = geojson.geo_bounds()?;
        Ok(Self {
            name: name.into(),
            geojson,
            bounds,
        })
    }

    /// Parses a GeoJSON document from raw bytes and creates a layer with it.
    pub fn from_slice(name: impl Into<String>, bytes: &[u8]) -> Result<Self, GeolensError> {
        let geojson = GeoJson::from_reader(bytes)
            .map_err(|err| GeolensError::Decoding(err.to_string()))?;
        Self::new(name, geojson)
    }

    /// Name of the dataset the layer was created from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The GeoJSON document of the layer.
    pub fn geojson(&self) -> &GeoJson {
        &self.geojson
    }

    /// Number of features in the document. A bare geometry counts as a single feature.
    pub fn feature_count(&self) -> usize {
        match &self.geojson {
            GeoJson::FeatureCollection(collection) => collection.features.len(),
            GeoJson::Feature(_) | GeoJson::Geometry(_) => 1,
        }
    }
}

impl Layer for FeatureLayer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn bounds(&self) -> Option<GeoRect> {
        self.bounds
    }
}
