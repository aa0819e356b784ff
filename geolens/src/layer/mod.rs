//! [Layers](Layer) specify data and the way it should be displayed on the map.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use geolens_types::geo::GeoRect;
use maybe_sync::{MaybeSend, MaybeSync};

pub mod attribution;
pub mod data_provider;
pub mod feature_layer;
pub mod group;
pub mod symbol;
pub mod tile_layer;

pub use attribution::Attribution;
pub use feature_layer::FeatureLayer;
pub use group::{LayerGroup, Shape};
pub use tile_layer::{TileIndex, TileLayer, TileLayerBuilder};

/// Layers specify data and the way it should be rendered on the map.
///
/// There are currently 3 types of layers:
/// * [`TileLayer`] - background imagery loaded tile by tile from a URL template.
/// * [`FeatureLayer`] - a GeoJSON dataset drawn over the background.
/// * [`LayerGroup`] - a set of [`Shape`]s (markers and polylines) that are added and removed
///   together.
pub trait Layer: MaybeSend + MaybeSync {
    /// A map stores layers as trait objects. This method can be used to convert the trait object into the concrete type.
    fn as_any(&self) -> &dyn Any;
    /// A map stores layers as trait objects. This method can be used to convert the trait object into the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Geographic extent of the layer content, if it is known and not empty.
    fn bounds(&self) -> Option<GeoRect> {
        None
    }
    /// Returns the attribution of the layer, if available.
    fn attribution(&self) -> Option<Attribution> {
        None
    }
}

/// Identifier of a layer or a shape inside a [`LayerGroup`]. Ids are unique for the lifetime of
/// the process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

impl LayerId {
    /// Generates a new unique id.
    pub fn next() -> Self {
        Self(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Used for tests
#[cfg(test)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct TestLayer(pub &'static str);

#[cfg(test)]
impl Layer for TestLayer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
