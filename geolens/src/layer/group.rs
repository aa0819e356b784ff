//! Groups of simple shapes.

use std::any::Any;

use geolens_types::geo::{GeoPoint2d, GeoRect};

use crate::layer::symbol::{CirclePointSymbol, LineSymbol};
use crate::layer::{Layer, LayerId};

/// Simple vector shape that can be put into a [`LayerGroup`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Circle marker at a point.
    Marker {
        /// Position of the marker.
        position: GeoPoint2d,
        /// How the marker is drawn.
        symbol: CirclePointSymbol,
    },
    /// Line connecting a sequence of points.
    Polyline {
        /// Vertices of the line in order.
        points: Vec<GeoPoint2d>,
        /// How the line is drawn.
        symbol: LineSymbol,
    },
}

impl Shape {
    /// Vertices of the shape.
    pub fn points(&self) -> &[GeoPoint2d] {
        match self {
            Shape::Marker { position, .. } => std::slice::from_ref(position),
            Shape::Polyline { points, .. } => points,
        }
    }
}

/// Container for shapes that are shown and removed together.
#[derive(Debug, Default, Clone)]
pub struct LayerGroup {
    shapes: Vec<(LayerId, Shape)>,
}

impl LayerGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape to the group and returns the id it can be removed with later.
    pub fn insert(&mut self, shape: Shape) -> LayerId {
        let id = LayerId::next();
        self.shapes.push((id, shape));
        id
    }

    /// Removes the shape with the given id. Returns `None` if there is no such shape.
    pub fn remove(&mut self, id: LayerId) -> Option<Shape> {
        let index = self.shapes.iter().position(|(shape_id, _)| *shape_id == id)?;
        Some(self.shapes.remove(index).1)
    }

    /// Iterates over the shapes in insertion order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.shapes.iter().map(|(_, shape)| shape)
    }

    /// Number of shapes in the group.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns true if the group has no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Layer for LayerGroup {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn bounds(&self) -> Option<GeoRect> {
        GeoRect::from_points(self.shapes().flat_map(|shape| shape.points().iter()))
    }
}

#[cfg(test)]
mod tests {
    use geolens_types::latlon;

    use super::*;

    fn marker(lat: f64, lon: f64) -> Shape {
        Shape::Marker {
            position: latlon!(lat, lon),
            symbol: CirclePointSymbol::default(),
        }
    }

    #[test]
    fn insert_and_remove() {
        let mut group = LayerGroup::new();
        assert!(group.is_empty());

        let first = group.insert(marker(1.0, 1.0));
        let second = group.insert(marker(2.0, 2.0));
        assert_ne!(first, second);
        assert_eq!(group.len(), 2);

        assert_eq!(group.remove(first), Some(marker(1.0, 1.0)));
        assert_eq!(group.remove(first), None);
        assert_eq!(group.shapes().collect::<Vec<_>>(), vec![&marker(2.0, 2.0)]);
    }

    #[test]
    fn bounds_include_lines_and_markers() {
        let mut group = LayerGroup::new();
        assert!(group.bounds().is_none());

        group.insert(marker(40.0, 27.0));
        group.insert(Shape::Polyline {
            points: vec![latlon!(39.0, 28.0), latlon!(41.0, 26.5)],
            symbol: LineSymbol::default(),
        });

        let bounds = group.bounds().unwrap();
        assert_eq!(bounds.south_west(), latlon!(39.0, 26.5));
        assert_eq!(bounds.north_east(), latlon!(41.0, 28.0));
    }
}
