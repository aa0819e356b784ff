//! Bounding boxes of GeoJSON documents.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Position, Value};

use crate::error::GeoTypesError;
use crate::geo::{GeoPoint, GeoRect, NewGeoPoint};

/// GeoJSON position viewed as a geographic point.
pub struct GeoJsonPoint(Position);

impl TryFrom<Position> for GeoJsonPoint {
    type Error = GeoTypesError;

    fn try_from(value: Position) -> Result<Self, Self::Error> {
        if value.len() < 2 {
            Err(GeoTypesError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            ))
        } else {
            Ok(GeoJsonPoint(value))
        }
    }
}

impl GeoPoint for GeoJsonPoint {
    fn lat(&self) -> f64 {
        self.0[1]
    }

    fn lon(&self) -> f64 {
        self.0[0]
    }
}

impl NewGeoPoint for GeoJsonPoint {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self(vec![lon, lat])
    }
}

/// Objects with a geographic extent.
pub trait GeoBounds {
    /// Returns the bounding box of all coordinates of the object, or `None` if the object has
    /// no coordinates at all (e.g. an empty feature collection).
    ///
    /// Fails if any position has less than two dimensions.
    fn geo_bounds(&self) -> Result<Option<GeoRect>, GeoTypesError>;
}

impl GeoBounds for Value {
    fn geo_bounds(&self) -> Result<Option<GeoRect>, GeoTypesError> {
        match self {
            Value::Point(p) => positions_bounds(std::iter::once(p)),
            Value::MultiPoint(points) | Value::LineString(points) => positions_bounds(points.iter()),
            Value::MultiLineString(lines) | Value::Polygon(lines) => {
                positions_bounds(lines.iter().flatten())
            }
            Value::MultiPolygon(polygons) => positions_bounds(polygons.iter().flatten().flatten()),
            Value::GeometryCollection(geometries) => merge_bounds(geometries.iter()),
        }
    }
}

impl GeoBounds for Geometry {
    fn geo_bounds(&self) -> Result<Option<GeoRect>, GeoTypesError> {
        self.value.geo_bounds()
    }
}

impl GeoBounds for Feature {
    fn geo_bounds(&self) -> Result<Option<GeoRect>, GeoTypesError> {
        match &self.geometry {
            Some(geometry) => geometry.geo_bounds(),
            None => Ok(None),
        }
    }
}

impl GeoBounds for FeatureCollection {
    fn geo_bounds(&self) -> Result<Option<GeoRect>, GeoTypesError> {
        merge_bounds(self.features.iter())
    }
}

impl GeoBounds for GeoJson {
    fn geo_bounds(&self) -> Result<Option<GeoRect>, GeoTypesError> {
        match self {
            GeoJson::Geometry(geometry) => geometry.geo_bounds(),
            GeoJson::Feature(feature) => feature.geo_bounds(),
            GeoJson::FeatureCollection(collection) => collection.geo_bounds(),
        }
    }
}

fn positions_bounds<'a>(
    positions: impl Iterator<Item = &'a Position>,
) -> Result<Option<GeoRect>, GeoTypesError> {
    let mut rect: Option<GeoRect> = None;
    for position in positions {
        let point = GeoJsonPoint::try_from(position.clone())?;
        match &mut rect {
            Some(rect) => rect.extend(&point),
            None => rect = Some(GeoRect::from_point(&point)),
        }
    }

    Ok(rect)
}

fn merge_bounds<'a, T: GeoBounds + 'a>(
    items: impl Iterator<Item = &'a T>,
) -> Result<Option<GeoRect>, GeoTypesError> {
    let mut rects = vec![];
    for item in items {
        if let Some(rect) = item.geo_bounds()? {
            rects.push(rect);
        }
    }

    Ok(GeoRect::merge_all(rects))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::latlon;

    fn parse(json: &str) -> GeoJson {
        json.parse().unwrap()
    }

    #[test]
    fn feature_collection_bounds() {
        let geojson = parse(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [27.0, 40.0]}},
                    {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[26.5, 39.5], [28.0, 41.0]]}},
                    {"type": "Feature", "properties": {}, "geometry": null}
                ]
            }"#,
        );

        let bounds = geojson.geo_bounds().unwrap().unwrap();
        assert_eq!(bounds, GeoRect::new(latlon!(39.5, 26.5), latlon!(41.0, 28.0)));
    }

    #[test]
    fn polygon_bounds_include_holes_and_rings() {
        let geojson = parse(
            r#"{"type": "MultiPolygon", "coordinates": [
                [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 0.0]]],
                [[[-3.0, 5.0], [-1.0, 5.0], [-1.0, 6.0], [-3.0, 5.0]]]
            ]}"#,
        );

        let bounds = geojson.geo_bounds().unwrap().unwrap();
        assert_eq!(bounds.south_west(), latlon!(0.0, -3.0));
        assert_eq!(bounds.north_east(), latlon!(6.0, 2.0));
    }

    #[test]
    fn empty_collection_has_no_bounds() {
        let geojson = parse(r#"{"type": "FeatureCollection", "features": []}"#);
        assert_matches!(geojson.geo_bounds(), Ok(None));
    }

    #[test]
    fn short_position_is_an_error() {
        let value = Value::Point(vec![1.0]);
        assert_matches!(value.geo_bounds(), Err(GeoTypesError::Conversion(_)));
    }
}
