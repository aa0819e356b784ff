use geolens_types::geo::{GeoPoint, GeoPoint2d};
use geolens_types::{latlon, Size};

use super::Map;
use crate::messenger::Messenger;
use crate::view::MapView;

const DEFAULT_Z_LEVEL: f64 = 4.0;
const DEFAULT_MAX_ZOOM: f64 = 18.0;
const DEFAULT_ZOOM_SNAP: f64 = 1.0;

/// Convenience type to initialize a [Map].
///
/// ```
/// use geolens::MapBuilder;
/// use geolens_types::geo::GeoPoint;
///
/// let map = MapBuilder::default()
///     .with_latlon(40.0, 27.0)
///     .with_z_level(8.0)
///     .with_zoom_snap(0.5)
///     .build();
///
/// assert_eq!(map.view().center().lat(), 40.0);
/// assert_eq!(map.view().zoom(), 8.0);
/// ```
#[derive(Default)]
pub struct MapBuilder {
    position: Option<GeoPoint2d>,
    z_level: Option<f64>,
    size: Option<Size>,
    max_zoom: Option<f64>,
    zoom_snap: Option<f64>,
    messenger: Option<Box<dyn Messenger>>,
}

impl MapBuilder {
    /// Sets the center point of the map to the given geographical point.
    ///
    /// Defaults to [0, 0].
    pub fn with_position(mut self, position: impl GeoPoint) -> Self {
        self.position = Some(GeoPoint2d::from(&position));
        self
    }

    /// Sets the center point of the map to the given geographical coordinates.
    ///
    /// Defaults to [0, 0].
    pub fn with_latlon(self, lat: f64, lon: f64) -> Self {
        self.with_position(latlon!(lat, lon))
    }

    /// Sets the zoom level of the map.
    ///
    /// Defaults to 4.
    pub fn with_z_level(mut self, z_level: f64) -> Self {
        self.z_level = Some(z_level);
        self
    }

    /// Sets the size of the map in pixels.
    ///
    /// Defaults to 1024x768.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    /// Sets the maximum zoom level of the map.
    ///
    /// Defaults to 18.
    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = Some(max_zoom);
        self
    }

    /// Sets the step the zoom level is rounded down to when the map is fitted to bounds.
    ///
    /// Defaults to 1.
    pub fn with_zoom_snap(mut self, zoom_snap: f64) -> Self {
        self.zoom_snap = Some(zoom_snap);
        self
    }

    /// Sets the messenger that is notified when the map content changes.
    pub fn with_messenger(mut self, messenger: impl Messenger + 'static) -> Self {
        self.messenger = Some(Box::new(messenger));
        self
    }

    /// Consumes the builder and creates the map.
    pub fn build(self) -> Map {
        let max_zoom = self.max_zoom.unwrap_or(DEFAULT_MAX_ZOOM);
        let zoom = self.z_level.unwrap_or(DEFAULT_Z_LEVEL).clamp(0.0, max_zoom);

        let mut view = MapView::new(self.position.unwrap_or_default(), zoom);
        if let Some(size) = self.size {
            view = view.with_size(size);
        }

        Map::new(
            view,
            max_zoom,
            self.zoom_snap.unwrap_or(DEFAULT_ZOOM_SNAP),
            self.messenger,
        )
    }
}
