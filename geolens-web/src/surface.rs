//! [`MapSurface`] backed by a Leaflet map.

use geolens::config::ViewerConfig;
use geolens::error::GeolensError;
use geolens::layer::{FeatureLayer, Shape, TileLayer};
use geolens::MapSurface;
use geolens_types::geo::{GeoPoint, GeoPoint2d, GeoRect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::leaflet::{self, LatLng, LeafletMouseEvent, MapOptions, PathOptions, TileLayerOptions};

/// Prefix of the container classes set by [`MapSurface::set_mode_class`].
const MODE_CLASS_PREFIX: &str = "leaflet-";

/// Handler of map clicks registered while the surface listens for clicks.
pub type ClickHandler = Closure<dyn FnMut(LeafletMouseEvent)>;

/// Map surface drawing with Leaflet.
pub struct LeafletSurface {
    map: leaflet::Map,
    click_handler: Option<ClickHandler>,
    listening_clicks: bool,
}

impl LeafletSurface {
    /// Creates a Leaflet map in the element with the given id.
    pub fn new(container_id: &str, config: &ViewerConfig) -> Result<Self, GeolensError> {
        let options = to_js(&MapOptions {
            zoom_control: true,
            zoom_snap: config.zoom_snap,
            max_zoom: config.max_zoom,
        })?;
        let map = leaflet::create_map(container_id, &options).map_err(js_error)?;

        Ok(Self {
            map,
            click_handler: None,
            listening_clicks: false,
        })
    }

    /// The underlying Leaflet map.
    pub fn map(&self) -> &leaflet::Map {
        &self.map
    }

    /// Sets the function called on map clicks while the surface listens for them.
    pub fn set_click_handler(&mut self, handler: ClickHandler) {
        let listening = self.listening_clicks;
        if listening {
            self.listen_clicks(false);
        }

        self.click_handler = Some(handler);

        if listening {
            self.listen_clicks(true);
        }
    }
}

impl MapSurface for LeafletSurface {
    type Handle = leaflet::Layer;

    fn set_view(&mut self, center: GeoPoint2d, zoom: f64) {
        self.map.set_view(&lat_lng(&center), zoom);
    }

    fn create_tile_layer(&mut self, layer: &TileLayer) -> Result<Self::Handle, GeolensError> {
        let options = to_js(&TileLayerOptions::from(layer))?;
        Ok(leaflet::tile_layer(layer.url_template(), &options))
    }

    fn create_feature_layer(&mut self, layer: FeatureLayer) -> Result<Self::Handle, GeolensError> {
        let data = to_js(layer.geojson())?;
        let handle = leaflet::geo_json(&data).map_err(js_error)?;

        log::debug!(
            "Created Leaflet layer for {} with {} features",
            layer.name(),
            layer.feature_count()
        );
        Ok(handle)
    }

    fn create_group(&mut self) -> Self::Handle {
        leaflet::layer_group().into()
    }

    fn add_layer(&mut self, layer: &Self::Handle) {
        if !self.map.has_layer(layer) {
            self.map.add_layer(layer);
        }
    }

    fn remove_layer(&mut self, layer: &Self::Handle) {
        self.map.remove_layer(layer);
    }

    fn add_shape(
        &mut self,
        group: &Self::Handle,
        shape: Shape,
    ) -> Result<Self::Handle, GeolensError> {
        let handle = match &shape {
            Shape::Marker { position, symbol } => {
                let options = to_js(&PathOptions::from(symbol))?;
                leaflet::circle_marker(&lat_lng(position), &options)
            }
            Shape::Polyline { points, symbol } => {
                let options = to_js(&PathOptions::from(symbol))?;
                let points: js_sys::Array = points.iter().map(lat_lng).collect();
                leaflet::polyline(&points, &options)
            }
        };

        as_group(group)?.add_layer(&handle);
        Ok(handle)
    }

    fn remove_shape(&mut self, group: &Self::Handle, shape: &Self::Handle) {
        match as_group(group) {
            Ok(group) => group.remove_layer(shape),
            Err(err) => log::warn!("Cannot remove shape: {err}"),
        }
    }

    fn fit_bounds(&mut self, bounds: GeoRect) {
        let bounds = leaflet::lat_lng_bounds(
            &lat_lng(&bounds.south_west()),
            &lat_lng(&bounds.north_east()),
        );
        self.map.fit_bounds(&bounds);
    }

    fn listen_clicks(&mut self, enabled: bool) {
        if enabled == self.listening_clicks {
            return;
        }

        let Some(handler) = &self.click_handler else {
            log::warn!("No click handler is set, map clicks are not delivered");
            return;
        };

        let function: &js_sys::Function = handler.as_ref().unchecked_ref();
        if enabled {
            self.map.on("click", function);
        } else {
            self.map.off("click", function);
        }

        self.listening_clicks = enabled;
    }

    fn set_mode_class(&mut self, class: &str, enabled: bool) {
        let class = format!("{MODE_CLASS_PREFIX}{class}");
        let class_list = self.map.get_container().class_list();
        let result = if enabled {
            class_list.add_1(&class)
        } else {
            class_list.remove_1(&class)
        };

        if let Err(err) = result {
            log::warn!("Failed to update map class {class}: {err:?}");
        }
    }

    fn distance(&self, from: &GeoPoint2d, to: &GeoPoint2d) -> f64 {
        self.map.distance(&lat_lng(from), &lat_lng(to))
    }
}

/// Converts a point into a Leaflet `LatLng`.
pub fn lat_lng(point: &GeoPoint2d) -> LatLng {
    LatLng::new(point.lat(), point.lon())
}

fn as_group(handle: &leaflet::Layer) -> Result<&leaflet::LayerGroup, GeolensError> {
    handle
        .dyn_ref::<leaflet::LayerGroup>()
        .ok_or_else(|| GeolensError::Generic("shapes can only be added to a layer group".into()))
}

fn to_js(value: &impl Serialize) -> Result<JsValue, GeolensError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| GeolensError::Wasm(Some(err.to_string())))
}

pub(crate) fn js_error(err: JsValue) -> GeolensError {
    GeolensError::Wasm(Some(err.as_string().unwrap_or_else(|| format!("{err:?}"))))
}
