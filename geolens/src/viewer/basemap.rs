use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::GeolensError;
use crate::layer::TileLayer;
use crate::surface::MapSurface;

/// Background imagery shown under the overlays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseLayer {
    /// Street map.
    #[default]
    Street,
    /// Satellite imagery.
    Satellite,
}

impl BaseLayer {
    /// The other base layer.
    pub fn other(self) -> Self {
        match self {
            BaseLayer::Street => BaseLayer::Satellite,
            BaseLayer::Satellite => BaseLayer::Street,
        }
    }
}

/// Switches between the street and the satellite tile layers, keeping exactly one of them on
/// the map.
pub struct BasemapToggle<H> {
    street: H,
    satellite: H,
    active: BaseLayer,
}

impl<H: Clone + Debug> BasemapToggle<H> {
    /// Creates both layers on the surface and shows the street layer.
    pub fn new<S>(surface: &mut S, street: &TileLayer, satellite: &TileLayer) -> Result<Self, GeolensError>
    where
        S: MapSurface<Handle = H>,
    {
        let street = surface.create_tile_layer(street)?;
        let satellite = surface.create_tile_layer(satellite)?;
        surface.add_layer(&street);

        Ok(Self {
            street,
            satellite,
            active: BaseLayer::Street,
        })
    }

    /// Base layer currently shown.
    pub fn active(&self) -> BaseLayer {
        self.active
    }

    /// Surface handle of the given base layer.
    pub fn handle(&self, layer: BaseLayer) -> &H {
        match layer {
            BaseLayer::Street => &self.street,
            BaseLayer::Satellite => &self.satellite,
        }
    }

    /// Replaces the shown base layer with the other one and returns the new active layer.
    pub fn toggle<S>(&mut self, surface: &mut S) -> BaseLayer
    where
        S: MapSurface<Handle = H>,
    {
        let next = self.active.other();
        surface.remove_layer(self.handle(self.active));
        surface.add_layer(self.handle(next));
        self.active = next;

        log::debug!("Base layer switched to {next:?}");
        next
    }
}
