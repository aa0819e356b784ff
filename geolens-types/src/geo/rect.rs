use serde::{Deserialize, Serialize};

use super::point::{GeoPoint, GeoPoint2d, NewGeoPoint};

/// Bounding box in geographic coordinates.
///
/// The box does not handle the antimeridian: `west` is always less than or equal to `east`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRect {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl GeoRect {
    /// Creates a new rect from its corners. The coordinates are reordered if needed, so that
    /// `south <= north` and `west <= east`.
    pub fn new(south_west: impl GeoPoint, north_east: impl GeoPoint) -> Self {
        Self {
            south: south_west.lat().min(north_east.lat()),
            west: south_west.lon().min(north_east.lon()),
            north: south_west.lat().max(north_east.lat()),
            east: south_west.lon().max(north_east.lon()),
        }
    }

    /// Rect of zero size located at the given point.
    pub fn from_point(p: &impl GeoPoint) -> Self {
        Self {
            south: p.lat(),
            west: p.lon(),
            north: p.lat(),
            east: p.lon(),
        }
    }

    /// Smallest rect containing all the given points. Returns `None` if the iterator is empty.
    pub fn from_points<'a, P: GeoPoint + 'a>(
        mut points: impl Iterator<Item = &'a P>,
    ) -> Option<Self> {
        let first = points.next()?;
        let mut rect = Self::from_point(first);
        for p in points {
            rect.extend(p);
        }

        Some(rect)
    }

    /// Grows the rect to include the point.
    pub fn extend(&mut self, p: &impl GeoPoint) {
        self.south = self.south.min(p.lat());
        self.west = self.west.min(p.lon());
        self.north = self.north.max(p.lat());
        self.east = self.east.max(p.lon());
    }

    /// Smallest rect containing both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    /// Union of all the given rects, or `None` if there are none.
    ///
    /// ```
    /// use geolens_types::geo::GeoRect;
    /// use geolens_types::latlon;
    ///
    /// assert!(GeoRect::merge_all(std::iter::empty()).is_none());
    ///
    /// let a = GeoRect::from_point(&latlon!(1.0, 2.0));
    /// let b = GeoRect::from_point(&latlon!(-1.0, 5.0));
    /// let union = GeoRect::merge_all([a, b]).unwrap();
    /// assert_eq!(union.south(), -1.0);
    /// assert_eq!(union.east(), 5.0);
    /// ```
    pub fn merge_all(rects: impl IntoIterator<Item = GeoRect>) -> Option<Self> {
        rects.into_iter().reduce(|acc, rect| acc.merge(rect))
    }

    /// Southern latitude.
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Western longitude.
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Northern latitude.
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Eastern longitude.
    pub fn east(&self) -> f64 {
        self.east
    }

    /// South-west corner.
    pub fn south_west(&self) -> GeoPoint2d {
        GeoPoint2d::latlon(self.south, self.west)
    }

    /// North-east corner.
    pub fn north_east(&self) -> GeoPoint2d {
        GeoPoint2d::latlon(self.north, self.east)
    }

    /// Returns true if the point is inside the rect or on its border.
    pub fn contains(&self, p: &impl GeoPoint) -> bool {
        self.south <= p.lat() && self.north >= p.lat() && self.west <= p.lon() && self.east >= p.lon()
    }

    /// Returns true if the rect has zero extent in both directions.
    pub fn is_point(&self) -> bool {
        self.south == self.north && self.west == self.east
    }
}
