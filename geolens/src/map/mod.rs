//! Headless map that keeps layers and the view in memory.

use ahash::{HashMap, HashSet};
use geolens_types::geo::{GeoPoint2d, GeoRect};

use crate::error::GeolensError;
use crate::layer::{Attribution, FeatureLayer, Layer, LayerGroup, LayerId, Shape, TileLayer};
use crate::messenger::Messenger;
use crate::surface::MapSurface;
use crate::view::MapView;

mod builder;
mod layer_collection;

pub use builder::MapBuilder;
pub use layer_collection::LayerCollection;

/// Map specifies a set of layers, and the view that should be shown.
///
/// Tile layers are always kept below other layers, the way web maps keep them in a separate
/// pane.
///
/// The map does not draw anything by itself. It is a complete [`MapSurface`], so it can drive
/// a [`Viewer`](crate::viewer::Viewer) in native applications and tests, while the actual
/// rendering is done by whatever inspects its layers and view.
pub struct Map {
    view: MapView,
    layers: LayerCollection,
    detached: HashMap<LayerId, Box<dyn Layer>>,
    mode_classes: HashSet<String>,
    listening_clicks: bool,
    max_zoom: f64,
    zoom_snap: f64,
    messenger: Option<Box<dyn Messenger>>,
}

impl Map {
    /// Creates a new map.
    pub fn new(
        view: MapView,
        max_zoom: f64,
        zoom_snap: f64,
        messenger: Option<Box<dyn Messenger + 'static>>,
    ) -> Self {
        Self {
            view,
            layers: LayerCollection::default(),
            detached: HashMap::default(),
            mode_classes: HashSet::default(),
            listening_clicks: false,
            max_zoom,
            zoom_snap,
            messenger,
        }
    }

    /// Current view of the map.
    pub fn view(&self) -> &MapView {
        &self.view
    }

    /// Changes the view of the map to the given one.
    pub fn set_view(&mut self, view: MapView) {
        self.view = view;
        self.redraw();
    }

    /// Layers currently shown on the map, bottom to top.
    pub fn layers(&self) -> &LayerCollection {
        &self.layers
    }

    /// Returns the layer with the given id, shown or not.
    pub fn layer(&self, id: LayerId) -> Option<&dyn Layer> {
        self.layers
            .get(id)
            .or_else(|| self.detached.get(&id).map(|layer| &**layer))
    }

    /// Returns the layer with the given id if it has the type `T`.
    pub fn layer_as<T: 'static>(&self, id: LayerId) -> Option<&T> {
        self.layer(id)?.as_any().downcast_ref()
    }

    /// Returns true if the layer is shown on the map.
    pub fn is_shown(&self, id: LayerId) -> bool {
        self.layers.contains(id)
    }

    /// Number of layers that were created but are not shown.
    pub fn detached_count(&self) -> usize {
        self.detached.len()
    }

    /// Returns true if the mode class is set.
    pub fn has_mode_class(&self, class: &str) -> bool {
        self.mode_classes.contains(class)
    }

    /// Returns true if clicks should be delivered to the application.
    pub fn is_listening_clicks(&self) -> bool {
        self.listening_clicks
    }

    /// Maximum zoom level the view can have.
    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Step the zoom level is rounded to when fitting bounds.
    pub fn zoom_snap(&self) -> f64 {
        self.zoom_snap
    }

    /// Attributions of the shown layers, bottom to top.
    pub fn attributions(&self) -> Vec<Attribution> {
        self.layers
            .iter()
            .filter_map(|layer| layer.attribution())
            .collect()
    }

    /// Request redraw of the map.
    pub fn redraw(&self) {
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw()
        }
    }

    fn insert_detached(&mut self, layer: impl Layer + 'static) -> LayerId {
        let id = LayerId::next();
        self.detached.insert(id, Box::new(layer));
        id
    }

    fn group_mut(&mut self, id: LayerId) -> Result<&mut LayerGroup, GeolensError> {
        let layer = match self.layers.get_mut(id) {
            Some(layer) => layer,
            None => self
                .detached
                .get_mut(&id)
                .ok_or_else(|| GeolensError::Generic(format!("layer {id:?} does not exist")))?,
        };

        layer
            .as_any_mut()
            .downcast_mut::<LayerGroup>()
            .ok_or_else(|| GeolensError::Generic(format!("layer {id:?} is not a shape group")))
    }
}

impl MapSurface for Map {
    type Handle = LayerId;

    fn set_view(&mut self, center: GeoPoint2d, zoom: f64) {
        let view = self
            .view
            .with_center(center)
            .with_zoom(zoom.clamp(0.0, self.max_zoom));
        Map::set_view(self, view);
    }

    fn create_tile_layer(&mut self, layer: &TileLayer) -> Result<LayerId, GeolensError> {
        Ok(self.insert_detached(layer.clone()))
    }

    fn create_feature_layer(&mut self, layer: FeatureLayer) -> Result<LayerId, GeolensError> {
        Ok(self.insert_detached(layer))
    }

    fn create_group(&mut self) -> LayerId {
        self.insert_detached(LayerGroup::new())
    }

    fn add_layer(&mut self, layer: &LayerId) {
        match self.detached.remove(layer) {
            Some(detached) => {
                if detached.as_any().is::<TileLayer>() {
                    let index = self
                        .layers
                        .iter()
                        .take_while(|shown| shown.as_any().is::<TileLayer>())
                        .count();
                    self.layers.insert_boxed(index, *layer, detached);
                } else {
                    self.layers.push_boxed(*layer, detached);
                }
                self.redraw();
            }
            None if self.layers.contains(*layer) => {}
            None => log::warn!("Cannot add unknown layer {layer:?} to the map"),
        }
    }

    fn remove_layer(&mut self, layer: &LayerId) {
        if let Some(removed) = self.layers.remove(*layer) {
            self.detached.insert(*layer, removed);
            self.redraw();
        }
    }

    fn drop_layer(&mut self, layer: LayerId) {
        if self.layers.remove(layer).is_some() {
            self.redraw();
        }
        self.detached.remove(&layer);
    }

    fn add_shape(&mut self, group: &LayerId, shape: Shape) -> Result<LayerId, GeolensError> {
        let id = self.group_mut(*group)?.insert(shape);
        if self.layers.contains(*group) {
            self.redraw();
        }

        Ok(id)
    }

    fn remove_shape(&mut self, group: &LayerId, shape: &LayerId) {
        let removed = match self.group_mut(*group) {
            Ok(layer) => layer.remove(*shape).is_some(),
            Err(err) => {
                log::warn!("Cannot remove shape {shape:?}: {err}");
                false
            }
        };

        if removed && self.layers.contains(*group) {
            self.redraw();
        }
    }

    fn fit_bounds(&mut self, bounds: GeoRect) {
        let view = self.view.fit_bounds(&bounds, self.max_zoom, self.zoom_snap);
        Map::set_view(self, view);
    }

    fn listen_clicks(&mut self, enabled: bool) {
        self.listening_clicks = enabled;
    }

    fn set_mode_class(&mut self, class: &str, enabled: bool) {
        if enabled {
            self.mode_classes.insert(class.to_string());
        } else {
            self.mode_classes.remove(class);
        }
    }
}
