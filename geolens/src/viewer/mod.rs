//! The viewer ties the map surface together with the base layer toggle, the overlay loader and
//! the measurement tool.
//!
//! All state lives in the [`Viewer`]. Front-ends forward user actions to its methods and read
//! back what to show in their own controls (active base layer, measurement info).
//!
//! Loading overlays is split into three steps, so that the viewer does not have to be borrowed
//! while data is being fetched:
//! 1. [`Viewer::select`] clears the overlays and issues a [`LoadTicket`];
//! 2. every fetched dataset is given to [`Viewer::attach_overlay`] with the ticket;
//! 3. [`Viewer::complete_load`] fits the view to what was loaded.
//!
//! When the viewer can be owned by the loading task, the [`Viewer::select_value`],
//! [`Viewer::load_single`] and [`Viewer::load_all`] helpers do all three steps.

use geolens_types::geo::GeoRect;

use crate::config::ViewerConfig;
use crate::control::{EventPropagation, UserEvent, UserEventHandler};
use crate::error::GeolensError;
use crate::layer::data_provider::DatasetProvider;
use crate::layer::FeatureLayer;
use crate::surface::MapSurface;

mod basemap;
mod format;
mod measure;
mod overlay;

pub use basemap::{BaseLayer, BasemapToggle};
pub use format::{format_distance, InfoText};
pub use measure::{MeasureSession, MeasureState, MeasureTool, MEASURING_CLASS};
pub use overlay::{LoadMode, LoadTicket, OverlayLoader, Selection};

/// Map viewer with switchable base layers, GeoJSON overlays and a distance measurement tool.
pub struct Viewer<S: MapSurface> {
    surface: S,
    config: ViewerConfig,
    basemap: BasemapToggle<S::Handle>,
    overlays: OverlayLoader<S::Handle>,
    measure: MeasureTool<S::Handle>,
    datasets: Vec<String>,
}

impl<S: MapSurface> Viewer<S> {
    /// Creates the base layers on the surface, shows the street layer and moves the view to the
    /// home position.
    ///
    /// Fails if a tile source in the configuration is invalid.
    pub fn new(mut surface: S, config: ViewerConfig) -> Result<Self, GeolensError> {
        let street = config.street.to_layer()?;
        let satellite = config.satellite.to_layer()?;
        let basemap = BasemapToggle::new(&mut surface, &street, &satellite)?;

        surface.set_view(config.home.center(), config.home.zoom);

        let mut viewer = Self {
            surface,
            basemap,
            overlays: OverlayLoader::new(),
            measure: MeasureTool::new(config.measure.clone()),
            datasets: vec![],
            config,
        };
        viewer.set_dataset_names(viewer.config.datasets.clone());

        log::info!(
            "Viewer started with {} overlay datasets",
            viewer.datasets.len()
        );
        Ok(viewer)
    }

    /// Replaces the list of datasets that can be loaded. Empty names and the "all datasets"
    /// value are skipped.
    pub fn set_dataset_names(&mut self, names: impl IntoIterator<Item = String>) {
        let all_value = &self.config.all_datasets_value;
        self.datasets = names
            .into_iter()
            .filter(|name| !name.is_empty() && name != all_value)
            .collect();
    }

    /// Datasets that can be loaded, in the order they are loaded by the "all datasets" selection.
    pub fn dataset_names(&self) -> &[String] {
        &self.datasets
    }

    /// The surface the viewer draws on.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Configuration the viewer was created with.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Moves the view back to the home position.
    pub fn go_home(&mut self) {
        let home = self.config.home;
        self.surface.set_view(home.center(), home.zoom);
    }

    /// Switches between the street and the satellite layer and returns the new active one.
    pub fn toggle_basemap(&mut self) -> BaseLayer {
        self.basemap.toggle(&mut self.surface)
    }

    /// Base layer currently shown.
    pub fn base_layer(&self) -> BaseLayer {
        self.basemap.active()
    }

    /// Starts or stops measuring. Returns true if measuring after the call.
    pub fn toggle_measure(&mut self) -> bool {
        self.measure.toggle(&mut self.surface)
    }

    /// Starts a new measurement, if not measuring yet.
    pub fn start_measuring(&mut self) {
        self.measure.start(&mut self.surface)
    }

    /// Finishes the measurement and removes its shapes.
    pub fn stop_measuring(&mut self) {
        self.measure.stop(&mut self.surface)
    }

    /// Returns true if a measurement is in progress.
    pub fn is_measuring(&self) -> bool {
        self.measure.is_measuring()
    }

    /// The ongoing measurement.
    pub fn measure_session(&self) -> Option<&MeasureSession<S::Handle>> {
        self.measure.session()
    }

    /// Text of the measurement info box, or `None` if the box should be hidden.
    pub fn info(&self) -> Option<InfoText> {
        self.measure.info()
    }

    /// Handles a user event on the map.
    pub fn handle_event(&mut self, event: &UserEvent) -> EventPropagation {
        self.measure.handle(event, &mut self.surface)
    }

    /// Number of overlays shown.
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Overlay state.
    pub fn overlays(&self) -> &OverlayLoader<S::Handle> {
        &self.overlays
    }

    /// Removes all overlays and invalidates loads in progress.
    pub fn clear_overlays(&mut self) {
        self.overlays.clear_all(&mut self.surface);
    }

    /// Applies a selection: removes all overlays, then returns the ticket for loading the
    /// selected datasets. Returns `None` if nothing has to be loaded.
    pub fn select(&mut self, selection: &Selection) -> Option<LoadTicket> {
        self.clear_overlays();

        match selection {
            Selection::None => None,
            Selection::Dataset(name) => Some(self.overlays.begin(LoadMode::Single(name.clone()))),
            Selection::All => Some(self.overlays.begin(LoadMode::All(self.datasets.clone()))),
        }
    }

    /// Shows a loaded dataset. Returns true if a layer was added.
    ///
    /// Load errors are logged here. Results of a ticket issued before the last
    /// [`Viewer::select`] or [`Viewer::clear_overlays`] are discarded.
    pub fn attach_overlay(
        &mut self,
        ticket: &LoadTicket,
        name: &str,
        result: Result<FeatureLayer, GeolensError>,
    ) -> bool {
        self.overlays
            .attach(&mut self.surface, ticket, name, result)
    }

    /// Fits the view to the overlays of the ticket. Returns the bounds the view was fitted to.
    pub fn complete_load(&mut self, ticket: &LoadTicket) -> Option<GeoRect> {
        self.overlays.complete(&mut self.surface, ticket)
    }

    /// Loads the datasets of the ticket one after another and fits the view to them.
    pub async fn run_load<P>(&mut self, provider: &P, ticket: LoadTicket) -> Option<GeoRect>
    where
        P: DatasetProvider + ?Sized,
    {
        for name in ticket.dataset_names() {
            let result = provider.load(name).await;
            self.attach_overlay(&ticket, name, result);
        }

        self.complete_load(&ticket)
    }

    /// Interprets the selector value and loads the selected datasets.
    pub async fn select_value<P>(&mut self, provider: &P, value: &str) -> Option<GeoRect>
    where
        P: DatasetProvider + ?Sized,
    {
        let selection = Selection::parse(value, &self.config.all_datasets_value);
        let ticket = self.select(&selection)?;
        self.run_load(provider, ticket).await
    }

    /// Loads a dataset as the single overlay, replacing the previous single overlay, and fits
    /// the view to it.
    pub async fn load_single<P>(&mut self, provider: &P, name: &str) -> Option<GeoRect>
    where
        P: DatasetProvider + ?Sized,
    {
        let ticket = self.overlays.begin(LoadMode::Single(name.to_string()));
        self.run_load(provider, ticket).await
    }

    /// Loads all known datasets, replacing the ones loaded by a previous call, and fits the
    /// view to the union of their bounds.
    pub async fn load_all<P>(&mut self, provider: &P) -> Option<GeoRect>
    where
        P: DatasetProvider + ?Sized,
    {
        self.overlays.drop_all_loaded(&mut self.surface);
        let ticket = self.overlays.begin(LoadMode::All(self.datasets.clone()));
        self.run_load(provider, ticket).await
    }
}

#[cfg(test)]
mod tests {
    use ahash::HashMap;
    use async_trait::async_trait;
    use geolens_types::geo::GeoPoint;
    use geolens_types::latlon;

    use super::*;
    use crate::control::MouseButton;
    use crate::layer::{Layer, LayerGroup, LayerId, Shape, TileLayer};
    use crate::map::{Map, MapBuilder};

    /// Serves datasets from memory. Missing names fail with 404.
    #[derive(Default)]
    struct MemoryProvider(HashMap<String, String>);

    impl MemoryProvider {
        fn with(mut self, name: &str, lat: f64, lon: f64) -> Self {
            self.0.insert(
                name.to_string(),
                format!(
                    r#"{{"type":"Feature","properties":{{}},"geometry":{{"type":"Point","coordinates":[{lon},{lat}]}}}}"#
                ),
            );
            self
        }

        fn with_raw(mut self, name: &str, content: &str) -> Self {
            self.0.insert(name.to_string(), content.to_string());
            self
        }
    }

    #[async_trait]
    impl DatasetProvider for MemoryProvider {
        async fn load(&self, name: &str) -> Result<FeatureLayer, GeolensError> {
            let content = self.0.get(name).ok_or(GeolensError::Http(404))?;
            FeatureLayer::from_slice(name, content.as_bytes())
        }
    }

    fn config(datasets: &[&str]) -> ViewerConfig {
        ViewerConfig {
            datasets: datasets.iter().map(|name| name.to_string()).collect(),
            ..Default::default()
        }
    }

    fn viewer(datasets: &[&str]) -> Viewer<Map> {
        Viewer::new(MapBuilder::default().with_zoom_snap(0.5).build(), config(datasets)).unwrap()
    }

    fn overlay_names(viewer: &Viewer<Map>) -> Vec<String> {
        viewer
            .overlays()
            .handles()
            .filter_map(|id| viewer.surface().layer_as::<FeatureLayer>(*id))
            .map(|layer| layer.name().to_string())
            .collect()
    }

    fn shown_tile_layers(viewer: &Viewer<Map>) -> Vec<LayerId> {
        viewer
            .surface()
            .layers()
            .ids()
            .filter(|id| viewer.surface().layer_as::<TileLayer>(*id).is_some())
            .collect()
    }

    #[test]
    fn starts_at_home_with_street_layer() {
        let viewer = viewer(&[]);
        let view = viewer.surface().view();
        assert_eq!(view.center(), latlon!(40.0, 27.0));
        assert_eq!(view.zoom(), 8.0);
        assert_eq!(viewer.base_layer(), BaseLayer::Street);
        assert_eq!(shown_tile_layers(&viewer).len(), 1);
        assert!(!viewer.is_measuring());
        assert!(viewer.info().is_none());
    }

    #[test]
    fn invalid_tile_source_fails() {
        let mut config = ViewerConfig::default();
        config.satellite.url_template = "https://example.com/{z}/{y}.png".to_string();
        let result = Viewer::new(MapBuilder::default().build(), config);
        assert!(matches!(result, Err(GeolensError::Configuration(_))));
    }

    #[test]
    fn dataset_names_skip_sentinel_and_empty() {
        let mut viewer = viewer(&["a.geojson", "", "show-all", "b.geojson"]);
        assert_eq!(viewer.dataset_names(), ["a.geojson", "b.geojson"]);

        viewer.set_dataset_names(vec!["c.geojson".to_string(), String::new()]);
        assert_eq!(viewer.dataset_names(), ["c.geojson"]);
    }

    #[test]
    fn go_home_restores_view() {
        let mut viewer = viewer(&[]);
        viewer
            .surface_mut()
            .fit_bounds(GeoRect::from_point(&latlon!(10.0, 10.0)));
        viewer.go_home();
        assert_eq!(viewer.surface().view().center(), latlon!(40.0, 27.0));
        assert_eq!(viewer.surface().view().zoom(), 8.0);
    }

    #[test]
    fn basemap_toggle_twice_returns_to_street() {
        let mut viewer = viewer(&[]);
        let street = shown_tile_layers(&viewer);

        assert_eq!(viewer.toggle_basemap(), BaseLayer::Satellite);
        let satellite = shown_tile_layers(&viewer);
        assert_eq!(satellite.len(), 1);
        assert_ne!(satellite, street);

        assert_eq!(viewer.toggle_basemap(), BaseLayer::Street);
        assert_eq!(shown_tile_layers(&viewer), street);
        assert_eq!(viewer.surface().layers().len(), 1);
    }

    #[test]
    fn selecting_replaces_previous_overlay() {
        let provider = MemoryProvider::default()
            .with("a.geojson", 39.0, 26.0)
            .with("b.geojson", 41.0, 29.0);
        let mut viewer = viewer(&["a.geojson", "b.geojson"]);

        tokio_test::block_on(viewer.select_value(&provider, "a.geojson")).unwrap();
        assert_eq!(overlay_names(&viewer), vec!["a.geojson"]);

        let bounds = tokio_test::block_on(viewer.select_value(&provider, "b.geojson")).unwrap();
        assert_eq!(overlay_names(&viewer), vec!["b.geojson"]);
        assert_eq!(bounds.south_west(), latlon!(41.0, 29.0));

        // Base layer and the B overlay only.
        assert_eq!(viewer.surface().layers().len(), 2);
        assert_eq!(viewer.surface().detached_count(), 1);
    }

    #[test]
    fn empty_selection_clears_overlays() {
        let provider = MemoryProvider::default().with("a.geojson", 39.0, 26.0);
        let mut viewer = viewer(&["a.geojson"]);

        tokio_test::block_on(viewer.select_value(&provider, "a.geojson"));
        assert_eq!(viewer.overlay_count(), 1);

        assert!(tokio_test::block_on(viewer.select_value(&provider, "")).is_none());
        assert_eq!(viewer.overlay_count(), 0);
        assert_eq!(viewer.surface().layers().len(), 1);
    }

    #[test]
    fn load_all_skips_failed_dataset() {
        let provider = MemoryProvider::default()
            .with("a.geojson", 39.0, 26.0)
            .with_raw("broken.geojson", "<html>Not found</html>")
            .with("c.geojson", 41.0, 29.0);
        let mut viewer = viewer(&["a.geojson", "broken.geojson", "missing.geojson", "c.geojson"]);

        let bounds = tokio_test::block_on(viewer.select_value(&provider, "show-all")).unwrap();

        assert_eq!(overlay_names(&viewer), vec!["a.geojson", "c.geojson"]);
        assert_eq!(bounds, GeoRect::new(latlon!(39.0, 26.0), latlon!(41.0, 29.0)));

        let view = viewer.surface().view();
        assert!(view.bounds().contains(&latlon!(39.0, 26.0)));
        assert!(view.bounds().contains(&latlon!(41.0, 29.0)));
        assert_eq!(view.zoom() % 0.5, 0.0);
    }

    #[test]
    fn load_all_with_nothing_loaded_keeps_view() {
        let provider = MemoryProvider::default();
        let mut viewer = viewer(&["a.geojson", "b.geojson"]);
        let view = *viewer.surface().view();

        assert!(tokio_test::block_on(viewer.load_all(&provider)).is_none());
        assert_eq!(*viewer.surface().view(), view);
        assert_eq!(viewer.overlay_count(), 0);
    }

    #[test]
    fn load_all_twice_does_not_duplicate() {
        let provider = MemoryProvider::default().with("a.geojson", 39.0, 26.0);
        let mut viewer = viewer(&["a.geojson"]);

        tokio_test::block_on(viewer.load_all(&provider));
        tokio_test::block_on(viewer.load_all(&provider));
        assert_eq!(viewer.overlay_count(), 1);
    }

    #[test]
    fn failed_single_load_keeps_view() {
        let provider = MemoryProvider::default();
        let mut viewer = viewer(&["a.geojson"]);
        let view = *viewer.surface().view();

        assert!(tokio_test::block_on(viewer.load_single(&provider, "a.geojson")).is_none());
        assert_eq!(viewer.overlay_count(), 0);
        assert_eq!(*viewer.surface().view(), view);
    }

    #[test]
    fn failed_single_load_keeps_previous_overlay() {
        let provider = MemoryProvider::default()
            .with("a.geojson", 39.0, 26.0)
            .with_raw("broken.geojson", "<html>Not found</html>");
        let mut viewer = viewer(&["a.geojson", "broken.geojson"]);

        let bounds = tokio_test::block_on(viewer.load_single(&provider, "a.geojson")).unwrap();
        let view = *viewer.surface().view();

        assert!(tokio_test::block_on(viewer.load_single(&provider, "broken.geojson")).is_none());
        assert!(tokio_test::block_on(viewer.load_single(&provider, "missing.geojson")).is_none());

        assert_eq!(overlay_names(&viewer), vec!["a.geojson"]);
        assert_eq!(viewer.overlays().single_name(), Some("a.geojson"));
        assert_eq!(*viewer.surface().view(), view);
        assert_eq!(bounds.south_west(), latlon!(39.0, 26.0));
    }

    #[test]
    fn late_result_of_previous_selection_is_dropped() {
        let provider = MemoryProvider::default()
            .with("a.geojson", 39.0, 26.0)
            .with("b.geojson", 41.0, 29.0);
        let mut viewer = viewer(&["a.geojson", "b.geojson"]);

        let slow = viewer
            .select(&Selection::Dataset("a.geojson".into()))
            .unwrap();
        let fast = viewer
            .select(&Selection::Dataset("b.geojson".into()))
            .unwrap();

        let b = tokio_test::block_on(provider.load("b.geojson"));
        assert!(viewer.attach_overlay(&fast, "b.geojson", b));
        viewer.complete_load(&fast);
        let view = *viewer.surface().view();

        let a = tokio_test::block_on(provider.load("a.geojson"));
        assert!(!viewer.attach_overlay(&slow, "a.geojson", a));
        assert!(viewer.complete_load(&slow).is_none());

        assert_eq!(overlay_names(&viewer), vec!["b.geojson"]);
        assert_eq!(*viewer.surface().view(), view);
    }

    #[test]
    fn measurement_through_viewer() {
        let mut viewer = viewer(&[]);
        let click = |lat, lon| UserEvent::Click(MouseButton::Left, latlon!(lat, lon));

        assert_eq!(viewer.handle_event(&click(0.0, 0.0)), EventPropagation::Propagate);

        assert!(viewer.toggle_measure());
        assert!(viewer.surface().has_mode_class(MEASURING_CLASS));
        assert_eq!(viewer.info(), Some(InfoText::Instructions));

        viewer.handle_event(&click(0.0, 0.0));
        assert_eq!(viewer.info(), Some(InfoText::Instructions));

        viewer.handle_event(&click(0.0, 0.009));
        let expected = latlon!(0.0, 0.0).haversine_distance(&latlon!(0.0, 0.009));
        assert_eq!(viewer.info(), Some(InfoText::Total(expected)));
        assert_eq!(format_distance(expected), "1.00 kilometre");

        assert!(!viewer.toggle_measure());
        assert!(viewer.info().is_none());
        assert!(!viewer.surface().is_listening_clicks());
    }

    #[test]
    fn measurement_keeps_single_line_when_line_is_already_gone() {
        let mut viewer = viewer(&[]);
        let click = |lat, lon| UserEvent::Click(MouseButton::Left, latlon!(lat, lon));
        let polylines = |viewer: &Viewer<Map>| {
            let group = *viewer.measure_session().unwrap().group();
            viewer
                .surface()
                .layer_as::<LayerGroup>(group)
                .unwrap()
                .shapes()
                .filter(|shape| matches!(shape, Shape::Polyline { .. }))
                .count()
        };

        viewer.start_measuring();
        viewer.handle_event(&click(0.0, 0.0));
        viewer.handle_event(&click(0.0, 0.01));
        assert_eq!(polylines(&viewer), 1);

        let session = viewer.measure_session().unwrap();
        let (group, line) = (*session.group(), *session.line().unwrap());
        viewer.surface_mut().remove_shape(&group, &line);
        assert_eq!(polylines(&viewer), 0);

        for lon in [0.02, 0.03, 0.04] {
            viewer.handle_event(&click(0.0, lon));
            assert_eq!(polylines(&viewer), 1);
        }

        let session = viewer.measure_session().unwrap();
        assert_eq!(session.points().len(), 5);
        assert_eq!(session.markers().len(), 5);
        let group_layer = viewer.surface().layer_as::<LayerGroup>(group).unwrap();
        assert_eq!(group_layer.len(), 6);
        let line = group_layer
            .shapes()
            .find(|shape| matches!(shape, Shape::Polyline { .. }))
            .unwrap();
        assert_eq!(line.points(), session.points());
    }

    #[test]
    fn measurement_is_independent_of_overlays() {
        let provider = MemoryProvider::default().with("a.geojson", 39.0, 26.0);
        let mut viewer = viewer(&["a.geojson"]);

        viewer.start_measuring();
        viewer.handle_event(&UserEvent::Click(MouseButton::Left, latlon!(1.0, 1.0)));
        tokio_test::block_on(viewer.select_value(&provider, "a.geojson"));
        tokio_test::block_on(viewer.select_value(&provider, ""));

        assert_eq!(viewer.measure_session().unwrap().points().len(), 1);

        viewer.stop_measuring();
        assert_eq!(viewer.surface().layers().len(), 1);
        assert!(viewer
            .surface()
            .layers()
            .iter()
            .all(|layer| layer.as_any().is::<TileLayer>()));
    }
}
