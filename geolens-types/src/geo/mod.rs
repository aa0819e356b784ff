//! Geometries in geographic coordinates (latitude and longitude) and the web-mercator projection
//! used to place them on tiled maps.

mod point;
mod rect;
mod web_mercator;

pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint};
pub use rect::GeoRect;
pub use web_mercator::{MercatorPoint, WebMercator};
