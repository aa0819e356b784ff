//! Abstraction over the map widget the viewer draws on.

use std::fmt::Debug;

use geolens_types::geo::{GeoPoint, GeoPoint2d, GeoRect};

use crate::error::GeolensError;
use crate::layer::{FeatureLayer, Shape, TileLayer};

/// Map widget that holds layers and a view, and reports clicks.
///
/// Layers are created detached and become visible after [`MapSurface::add_layer`]. A removed
/// layer keeps its state and can be added again, so the base layers are created once and then
/// swapped in and out.
///
/// The crate provides a headless implementation in [`Map`](crate::map::Map). Front-ends
/// implement this trait for the widget library they use.
pub trait MapSurface {
    /// Reference to a layer or a shape on the surface.
    type Handle: Clone + Debug;

    /// Centers the map at the given point with the given zoom level.
    fn set_view(&mut self, center: GeoPoint2d, zoom: f64);

    /// Creates a detached tile layer.
    fn create_tile_layer(&mut self, layer: &TileLayer) -> Result<Self::Handle, GeolensError>;

    /// Creates a detached layer that draws the features of the GeoJSON document.
    fn create_feature_layer(&mut self, layer: FeatureLayer) -> Result<Self::Handle, GeolensError>;

    /// Creates a detached empty group for shapes.
    fn create_group(&mut self) -> Self::Handle;

    /// Makes the layer visible. Tile layers are shown below all other layers, the rest are put
    /// on top. Does nothing if the layer is already on the map.
    fn add_layer(&mut self, layer: &Self::Handle);

    /// Removes the layer from the map but keeps it so it can be added again. Does nothing if
    /// the layer is not on the map.
    fn remove_layer(&mut self, layer: &Self::Handle);

    /// Removes the layer from the map and releases it. The handle must not be used after that.
    fn drop_layer(&mut self, layer: Self::Handle) {
        self.remove_layer(&layer);
    }

    /// Adds a shape to a group created by [`MapSurface::create_group`] and returns a handle
    /// to the shape.
    fn add_shape(&mut self, group: &Self::Handle, shape: Shape) -> Result<Self::Handle, GeolensError>;

    /// Removes a shape from its group. Does nothing if the shape is not in the group.
    fn remove_shape(&mut self, group: &Self::Handle, shape: &Self::Handle);

    /// Changes the view so that the bounds are fully visible with the largest possible zoom.
    fn fit_bounds(&mut self, bounds: GeoRect);

    /// Enables or disables delivery of click events to the application.
    fn listen_clicks(&mut self, enabled: bool);

    /// Sets or clears a CSS-like mode class on the map container, e.g. to change the cursor
    /// while a tool is active.
    fn set_mode_class(&mut self, class: &str, enabled: bool);

    /// Distance in meters between two points as measured by the map.
    fn distance(&self, from: &GeoPoint2d, to: &GeoPoint2d) -> f64 {
        from.haversine_distance(to)
    }
}
