//! Bindings to the parts of the Leaflet API used by the viewer.
//!
//! Leaflet is expected to be loaded by the page as the global `L` object.

use geolens::layer::symbol::{CirclePointSymbol, LineSymbol};
use geolens::layer::TileLayer;
use geolens::Color;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Anything that can be added to a map: tile layers, GeoJSON layers, groups and shapes.
    #[wasm_bindgen(js_namespace = L, js_name = Layer)]
    #[derive(Debug, Clone)]
    pub type Layer;

    /// Leaflet map widget.
    #[wasm_bindgen(js_namespace = L, js_name = Map)]
    #[derive(Debug, Clone)]
    pub type Map;

    /// Creates a map in the element with the given id.
    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    pub fn create_map(element_id: &str, options: &JsValue) -> Result<Map, JsValue>;

    /// Centers the map at the point with the given zoom.
    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, center: &LatLng, zoom: f64);

    /// Adds a layer.
    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &Map, layer: &Layer);

    /// Removes a layer. Does nothing if the layer is not added.
    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &Map, layer: &Layer);

    /// Returns true if the layer is on the map.
    #[wasm_bindgen(method, js_name = hasLayer)]
    pub fn has_layer(this: &Map, layer: &Layer) -> bool;

    /// Sets the largest zoom that shows the whole area.
    #[wasm_bindgen(method, js_name = fitBounds)]
    pub fn fit_bounds(this: &Map, bounds: &LatLngBounds);

    /// Adds an event listener.
    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, handler: &js_sys::Function);

    /// Removes an event listener added with `on`.
    #[wasm_bindgen(method)]
    pub fn off(this: &Map, event: &str, handler: &js_sys::Function);

    /// Distance in meters as computed by the map CRS.
    #[wasm_bindgen(method)]
    pub fn distance(this: &Map, from: &LatLng, to: &LatLng) -> f64;

    /// Element the map is drawn in.
    #[wasm_bindgen(method, js_name = getContainer)]
    pub fn get_container(this: &Map) -> web_sys::HtmlElement;

    /// Geographical point.
    #[wasm_bindgen(js_namespace = L, js_name = LatLng)]
    #[derive(Debug, Clone)]
    pub type LatLng;

    /// Creates a point from latitude and longitude.
    #[wasm_bindgen(constructor, js_namespace = L)]
    pub fn new(lat: f64, lng: f64) -> LatLng;

    /// Latitude in degrees.
    #[wasm_bindgen(method, getter)]
    pub fn lat(this: &LatLng) -> f64;

    /// Longitude in degrees.
    #[wasm_bindgen(method, getter)]
    pub fn lng(this: &LatLng) -> f64;

    /// Rectangular geographical area.
    #[wasm_bindgen(js_namespace = L, js_name = LatLngBounds)]
    #[derive(Debug, Clone)]
    pub type LatLngBounds;

    /// Creates bounds from the corner points.
    #[wasm_bindgen(js_namespace = L, js_name = latLngBounds)]
    pub fn lat_lng_bounds(south_west: &LatLng, north_east: &LatLng) -> LatLngBounds;

    /// Event passed to map `click` listeners.
    #[derive(Debug, Clone)]
    pub type LeafletMouseEvent;

    /// Point that was clicked.
    #[wasm_bindgen(method, getter)]
    pub fn latlng(this: &LeafletMouseEvent) -> LatLng;

    /// DOM event that fired the Leaflet event.
    #[wasm_bindgen(method, getter, js_name = originalEvent)]
    pub fn original_event(this: &LeafletMouseEvent) -> Option<web_sys::MouseEvent>;

    /// Layer holding other layers that are shown and hidden together.
    #[wasm_bindgen(extends = Layer, js_namespace = L, js_name = LayerGroup)]
    #[derive(Debug, Clone)]
    pub type LayerGroup;

    /// Creates an empty group.
    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    pub fn layer_group() -> LayerGroup;

    /// Adds a layer.
    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &LayerGroup, layer: &Layer);

    /// Removes a layer. Does nothing if the layer is not added.
    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &LayerGroup, layer: &Layer);

    /// Creates a tile layer.
    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url_template: &str, options: &JsValue) -> Layer;

    /// Creates a layer drawing a GeoJSON object. Throws for invalid GeoJSON.
    #[wasm_bindgen(catch, js_namespace = L, js_name = geoJSON)]
    pub fn geo_json(data: &JsValue) -> Result<Layer, JsValue>;

    /// Creates a circle of fixed screen radius.
    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    pub fn circle_marker(position: &LatLng, options: &JsValue) -> Layer;

    /// Creates a polyline through an array of `LatLng`.
    #[wasm_bindgen(js_namespace = L, js_name = polyline)]
    pub fn polyline(points: &js_sys::Array, options: &JsValue) -> Layer;
}

/// Options of `L.map`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    /// Show the zoom buttons.
    pub zoom_control: bool,
    /// Zoom levels are snapped to multiples of this value.
    pub zoom_snap: f64,
    /// Maximum zoom level.
    pub max_zoom: f64,
}

/// Options of `L.tileLayer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerOptions {
    /// Values of `{s}`. Leaflet uses `abc` if empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subdomains: Vec<String>,
    /// Maximum zoom the tiles are requested for.
    pub max_zoom: u8,
    /// HTML shown in the attribution control.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

impl From<&TileLayer> for TileLayerOptions {
    fn from(layer: &TileLayer) -> Self {
        use geolens::layer::Layer as _;

        Self {
            subdomains: layer.subdomains().to_vec(),
            max_zoom: layer.max_zoom(),
            attribution: layer.attribution().map(|attribution| attribution.to_html()),
        }
    }
}

/// Style options of Leaflet vector shapes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct PathOptions {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl From<&CirclePointSymbol> for PathOptions {
    fn from(symbol: &CirclePointSymbol) -> Self {
        Self {
            color: symbol.color.to_css_hex(),
            opacity: non_opaque(symbol.color),
            fill_color: Some(symbol.fill_color.to_css_hex()),
            fill_opacity: Some(symbol.fill_opacity),
            radius: Some(symbol.radius),
            ..Default::default()
        }
    }
}

impl From<&LineSymbol> for PathOptions {
    fn from(symbol: &LineSymbol) -> Self {
        Self {
            color: symbol.color.to_css_hex(),
            opacity: Some(symbol.opacity * symbol.color.opacity()),
            weight: Some(symbol.width),
            dash_array: symbol.dash_pattern(),
            ..Default::default()
        }
    }
}

fn non_opaque(color: Color) -> Option<f64> {
    (color.a() < 255).then(|| color.opacity())
}

#[cfg(test)]
mod tests {
    use geolens::config::TileSourceConfig;
    use serde_json::json;

    use super::*;

    #[test]
    fn circle_marker_options() {
        let options = PathOptions::from(&CirclePointSymbol::default());
        assert_eq!(
            serde_json::to_value(options).unwrap(),
            json!({ "color": "#ff4400", "fillColor": "#ff4400", "fillOpacity": 1.0, "radius": 5.0 })
        );
    }

    #[test]
    fn line_options() {
        let options = PathOptions::from(&LineSymbol::default());
        assert_eq!(options.color, "#ff4400");
        assert_eq!(options.weight, Some(3.0));
        assert_eq!(options.opacity, Some(0.7));
        assert_eq!(options.dash_array.as_deref(), Some("5, 10"));
        assert_eq!(options.radius, None);
    }

    #[test]
    fn tile_options() {
        let street = TileSourceConfig::street().to_layer().unwrap();
        let options = TileLayerOptions::from(&street);
        assert_eq!(options.subdomains, vec!["a", "b", "c"]);
        assert_eq!(options.max_zoom, 18);
        assert_eq!(
            options.attribution.as_deref(),
            Some("<a href=\"https://www.openstreetmap.org/copyright\">© OpenStreetMap</a>")
        );

        let json = serde_json::to_value(TileLayerOptions {
            subdomains: vec![],
            max_zoom: 18,
            attribution: None,
        })
        .unwrap();
        assert_eq!(json, json!({ "maxZoom": 18 }));
    }
}
