use std::f64::consts::{FRAC_PI_4, PI};

use super::point::{GeoPoint, GeoPoint2d, NewGeoPoint};

/// Point in the normalized web-mercator plane. Both coordinates are in `[0, 1]` range for
/// latitudes within [`WebMercator::MAX_LATITUDE`], with `(0, 0)` at the north-west corner of the
/// world, the same orientation that tile indices use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorPoint {
    /// Horizontal coordinate, growing to the east.
    pub x: f64,
    /// Vertical coordinate, growing to the south.
    pub y: f64,
}

/// Spherical web-mercator projection (EPSG:3857) as used by slippy map tiles.
#[derive(Debug, Copy, Clone, Default)]
pub struct WebMercator;

impl WebMercator {
    /// Latitudes beyond this value cannot be displayed by the projection and are clamped.
    pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

    /// Projects a geographic point into the normalized plane.
    pub fn project(&self, point: &impl GeoPoint) -> MercatorPoint {
        let lat = point
            .lat()
            .clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE)
            .to_radians();
        let x = (point.lon() + 180.0) / 360.0;
        let y = 0.5 - (FRAC_PI_4 + lat / 2.0).tan().ln() / (2.0 * PI);

        MercatorPoint { x, y }
    }

    /// Inverse of [`WebMercator::project`].
    pub fn unproject(&self, point: MercatorPoint) -> GeoPoint2d {
        let lon = point.x * 360.0 - 180.0;
        let lat = (2.0 * ((0.5 - point.y) * 2.0 * PI).exp().atan() - PI / 2.0).to_degrees();

        GeoPoint2d::latlon(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::latlon;

    #[test]
    fn origin_is_in_the_middle() {
        let projected = WebMercator.project(&latlon!(0.0, 0.0));
        assert_relative_eq!(projected.x, 0.5);
        assert_relative_eq!(projected.y, 0.5);
    }

    #[test]
    fn max_latitude_is_the_top_edge() {
        let projected = WebMercator.project(&latlon!(90.0, -180.0));
        assert_relative_eq!(projected.x, 0.0);
        assert_relative_eq!(projected.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn unproject_restores_point() {
        let point = latlon!(40.0, 27.0);
        let restored = WebMercator.unproject(WebMercator.project(&point));
        assert_relative_eq!(restored.lat(), 40.0, epsilon = 1e-9);
        assert_relative_eq!(restored.lon(), 27.0, epsilon = 1e-9);
    }
}
