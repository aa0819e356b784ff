use geolens_types::geo::{GeoPoint2d, GeoRect, MercatorPoint, NewGeoPoint, WebMercator};
use geolens_types::Size;

/// Size of a tile side in pixels. At zoom level `z` the whole world is `TILE_SIZE * 2^z` pixels
/// wide.
pub const TILE_SIZE: f64 = 256.0;

/// Map view specifies the area of the map that should be drawn.
///
/// The view is given by the geographic point at the center of the screen, the zoom level of the
/// standard tile grid (may be fractional) and the size of the screen in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    center: GeoPoint2d,
    zoom: f64,
    size: Size,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: GeoPoint2d::default(),
            zoom: 0.0,
            size: Size::new(1024.0, 768.0),
        }
    }
}

impl MapView {
    /// Creates a new view centered at the point with the given zoom level.
    pub fn new(center: GeoPoint2d, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            ..Default::default()
        }
    }

    /// View of the given point at the given zoom with default screen size.
    pub fn at_latlon(lat: f64, lon: f64, zoom: f64) -> Self {
        Self::new(GeoPoint2d::latlon(lat, lon), zoom)
    }

    /// Geographic point at the center of the screen.
    pub fn center(&self) -> GeoPoint2d {
        self.center
    }

    /// Zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Size of the screen in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Creates a new view, same as the current one, but with the given center.
    pub fn with_center(&self, center: GeoPoint2d) -> Self {
        Self { center, ..*self }
    }

    /// Creates a new view, same as the current one, but with the given zoom level.
    pub fn with_zoom(&self, zoom: f64) -> Self {
        Self { zoom, ..*self }
    }

    /// Creates a new view, same as the current one, but with the given screen size.
    pub fn with_size(&self, size: Size) -> Self {
        Self { size, ..*self }
    }

    /// Width of the whole world in pixels at the given zoom.
    fn world_size(zoom: f64) -> f64 {
        TILE_SIZE * 2f64.powf(zoom)
    }

    /// Geographic area visible on the screen.
    pub fn bounds(&self) -> GeoRect {
        let center = WebMercator.project(&self.center);
        let world = Self::world_size(self.zoom);
        let dx = self.size.half_width() / world;
        let dy = self.size.half_height() / world;

        let north_west = WebMercator.unproject(MercatorPoint {
            x: center.x - dx,
            y: center.y - dy,
        });
        let south_east = WebMercator.unproject(MercatorPoint {
            x: center.x + dx,
            y: center.y + dy,
        });

        GeoRect::new(north_west, south_east)
    }

    /// Returns a view that shows the whole `bounds` with the largest zoom level that is a
    /// multiple of `zoom_snap` and does not exceed `max_zoom`.
    ///
    /// If the screen has zero size, only the center is changed.
    ///
    /// ```
    /// use geolens::MapView;
    /// use geolens_types::geo::GeoRect;
    /// use geolens_types::{latlon, Size};
    ///
    /// let view = MapView::default().with_size(Size::new(512.0, 512.0));
    /// let world = GeoRect::new(latlon!(-85.0, -180.0), latlon!(85.0, 180.0));
    ///
    /// let fitted = view.fit_bounds(&world, 18.0, 0.5);
    /// assert_eq!(fitted.zoom(), 1.0);
    /// ```
    pub fn fit_bounds(&self, bounds: &GeoRect, max_zoom: f64, zoom_snap: f64) -> Self {
        let south_west = WebMercator.project(&bounds.south_west());
        let north_east = WebMercator.project(&bounds.north_east());

        let center = WebMercator.unproject(MercatorPoint {
            x: (south_west.x + north_east.x) / 2.0,
            y: (south_west.y + north_east.y) / 2.0,
        });

        if self.size.is_zero() {
            return self.with_center(center);
        }

        let dx = (north_east.x - south_west.x).abs();
        let dy = (south_west.y - north_east.y).abs();
        let scale_x = if dx > 0.0 {
            self.size.width() / (TILE_SIZE * dx)
        } else {
            f64::INFINITY
        };
        let scale_y = if dy > 0.0 {
            self.size.height() / (TILE_SIZE * dy)
        } else {
            f64::INFINITY
        };

        let mut zoom = scale_x.min(scale_y).log2();
        if zoom_snap > 0.0 && zoom.is_finite() {
            zoom = (zoom / zoom_snap).floor() * zoom_snap;
        }

        Self {
            center,
            zoom: zoom.clamp(0.0, max_zoom),
            size: self.size,
        }
    }
}
