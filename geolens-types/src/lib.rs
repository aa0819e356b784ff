//! Geographic primitives used by the `geolens` map viewer.
//!
//! * [`geo::GeoPoint`] and [`geo::GeoPoint2d`] represent points given in latitude and longitude
//!   (degrees, WGS84). Use the [`latlon!`] macro to create them.
//! * [`geo::GeoRect`] is a latitude/longitude bounding box that can be merged with others to
//!   obtain the extent of several datasets.
//! * [`geo::WebMercator`] converts points to and from the projection used by web map tiles.
//! * With the `geojson` feature, [`geojson::GeoBounds`] extracts bounding boxes from GeoJSON
//!   documents.

pub mod error;
pub mod geo;
#[cfg(feature = "geojson")]
pub mod geojson;
mod size;

pub use size::Size;
