use std::fmt::Debug;

use geolens_types::geo::GeoRect;

use crate::error::GeolensError;
use crate::layer::{FeatureLayer, Layer};
use crate::surface::MapSurface;

/// Overlay choice made by the user in the dataset selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No overlay.
    None,
    /// A single dataset with the given name.
    Dataset(String),
    /// All known datasets at once.
    All,
}

impl Selection {
    /// Interprets a selector value. An empty value means no overlay, `all_value` selects all
    /// datasets and anything else is a dataset name.
    ///
    /// ```
    /// use geolens::viewer::Selection;
    ///
    /// assert_eq!(Selection::parse("", "show-all"), Selection::None);
    /// assert_eq!(Selection::parse("show-all", "show-all"), Selection::All);
    /// assert_eq!(
    ///     Selection::parse("roads.geojson", "show-all"),
    ///     Selection::Dataset("roads.geojson".to_string())
    /// );
    /// ```
    pub fn parse(value: &str, all_value: &str) -> Self {
        if value.is_empty() {
            Selection::None
        } else if value == all_value {
            Selection::All
        } else {
            Selection::Dataset(value.to_string())
        }
    }
}

/// What a load started with a [`LoadTicket`] does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMode {
    /// Load one dataset, replace the previous single overlay and fit the view to it.
    Single(String),
    /// Load every listed dataset, keep the ones that loaded and fit the view to all of them.
    All(Vec<String>),
}

/// Ties the results of a load to the overlay state it was started for.
///
/// Every [`OverlayLoader::clear_all`] call starts a new generation. Results that come with a
/// ticket of an older generation are discarded, so a slow response for a previous selection
/// never shows up after the user has selected something else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    mode: LoadMode,
}

impl LoadTicket {
    /// Generation the ticket was issued in.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// What the load does.
    pub fn mode(&self) -> &LoadMode {
        &self.mode
    }

    /// Names of the datasets to load, in order.
    pub fn dataset_names(&self) -> &[String] {
        match &self.mode {
            LoadMode::Single(name) => std::slice::from_ref(name),
            LoadMode::All(names) => names,
        }
    }
}

struct OverlayEntry<H> {
    name: String,
    handle: H,
    bounds: Option<GeoRect>,
}

/// Keeps track of the GeoJSON overlays shown on the map.
///
/// There is at most one single overlay (shown by selecting one dataset) and any number of
/// overlays loaded by the "all datasets" selection.
pub struct OverlayLoader<H> {
    single: Option<OverlayEntry<H>>,
    all: Vec<OverlayEntry<H>>,
    generation: u64,
}

impl<H> Default for OverlayLoader<H> {
    fn default() -> Self {
        Self {
            single: None,
            all: vec![],
            generation: 0,
        }
    }
}

impl<H: Clone + Debug> OverlayLoader<H> {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if results of the ticket can still be attached.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Removes every overlay from the surface and starts a new generation, invalidating all
    /// tickets issued before.
    pub fn clear_all<S>(&mut self, surface: &mut S)
    where
        S: MapSurface<Handle = H>,
    {
        if let Some(single) = self.single.take() {
            surface.drop_layer(single.handle);
        }
        self.drop_all_loaded(surface);
        self.generation += 1;
    }

    /// Removes the overlays loaded with [`LoadMode::All`] without invalidating tickets.
    pub fn drop_all_loaded<S>(&mut self, surface: &mut S)
    where
        S: MapSurface<Handle = H>,
    {
        for entry in self.all.drain(..) {
            surface.drop_layer(entry.handle);
        }
    }

    /// Issues a ticket for a load in the current generation.
    pub fn begin(&self, mode: LoadMode) -> LoadTicket {
        LoadTicket {
            generation: self.generation,
            mode,
        }
    }

    /// Shows the loaded dataset on the surface, or logs the load error.
    ///
    /// Returns true if a layer was attached. Nothing is attached for a stale ticket.
    pub fn attach<S>(
        &mut self,
        surface: &mut S,
        ticket: &LoadTicket,
        name: &str,
        result: Result<FeatureLayer, GeolensError>,
    ) -> bool
    where
        S: MapSurface<Handle = H>,
    {
        if !self.is_current(ticket) {
            log::debug!(
                "Discarding dataset {name} loaded for generation {}, current is {}",
                ticket.generation,
                self.generation
            );
            return false;
        }

        let layer = match result {
            Ok(layer) => layer,
            Err(err) => {
                Self::log_failure(ticket, name, &err);
                return false;
            }
        };

        let bounds = layer.bounds();
        let handle = match surface.create_feature_layer(layer) {
            Ok(handle) => handle,
            Err(err) => {
                Self::log_failure(ticket, name, &err);
                return false;
            }
        };
        surface.add_layer(&handle);

        let entry = OverlayEntry {
            name: name.to_string(),
            handle,
            bounds,
        };

        match ticket.mode {
            LoadMode::Single(_) => {
                if let Some(previous) = self.single.replace(entry) {
                    surface.drop_layer(previous.handle);
                }
            }
            LoadMode::All(_) => self.all.push(entry),
        }

        true
    }

    fn log_failure(ticket: &LoadTicket, name: &str, err: &GeolensError) {
        match ticket.mode {
            LoadMode::Single(_) => log::error!("Failed to load dataset {name}: {err}"),
            LoadMode::All(_) => log::warn!("Dataset {name} could not be loaded: {err}"),
        }
    }

    /// Fits the view to the overlays loaded with the ticket and returns the fitted bounds.
    ///
    /// Nothing is done for a stale ticket or if the loaded overlays have no bounds.
    pub fn complete<S>(&mut self, surface: &mut S, ticket: &LoadTicket) -> Option<GeoRect>
    where
        S: MapSurface<Handle = H>,
    {
        if !self.is_current(ticket) {
            log::debug!("Not fitting bounds for a stale load of {:?}", ticket.mode);
            return None;
        }

        let bounds = match &ticket.mode {
            LoadMode::Single(name) => self
                .single
                .as_ref()
                .filter(|entry| &entry.name == name)
                .and_then(|entry| entry.bounds),
            LoadMode::All(_) => GeoRect::merge_all(self.all.iter().filter_map(|entry| entry.bounds)),
        };

        match bounds {
            Some(bounds) => {
                surface.fit_bounds(bounds);
                Some(bounds)
            }
            None => {
                log::info!("Loaded overlays have no extent, the view is not changed");
                None
            }
        }
    }

    /// Name of the single overlay, if shown.
    pub fn single_name(&self) -> Option<&str> {
        self.single.as_ref().map(|entry| entry.name.as_str())
    }

    /// Names of the overlays loaded with [`LoadMode::All`], in load order.
    pub fn all_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.all.iter().map(|entry| entry.name.as_str())
    }

    /// Surface handles of every overlay shown.
    pub fn handles(&self) -> impl Iterator<Item = &H> + '_ {
        self.single
            .iter()
            .chain(self.all.iter())
            .map(|entry| &entry.handle)
    }

    /// Number of overlays shown.
    pub fn len(&self) -> usize {
        self.all.len() + usize::from(self.single.is_some())
    }

    /// Returns true if no overlays are shown.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geolens_types::geo::GeoPoint;
    use geolens_types::latlon;

    use super::*;
    use crate::layer::LayerId;
    use crate::map::{Map, MapBuilder};

    fn layer(name: &str, lat: f64, lon: f64) -> FeatureLayer {
        let json = format!(r#"{{"type":"Point","coordinates":[{lon},{lat}]}}"#);
        FeatureLayer::from_slice(name, json.as_bytes()).unwrap()
    }

    fn setup() -> (Map, OverlayLoader<LayerId>) {
        (
            MapBuilder::default().with_max_zoom(18.0).build(),
            OverlayLoader::new(),
        )
    }

    #[test]
    fn single_load_fits_view() {
        let (mut map, mut loader) = setup();
        let ticket = loader.begin(LoadMode::Single("a".into()));

        assert!(loader.attach(&mut map, &ticket, "a", Ok(layer("a", 40.0, 27.0))));
        let bounds = loader.complete(&mut map, &ticket).unwrap();

        assert!(bounds.is_point());
        assert_relative_eq!(map.view().center().lat(), 40.0, epsilon = 1e-9);
        assert_eq!(map.view().zoom(), 18.0);
        assert_eq!(loader.single_name(), Some("a"));
        assert_eq!(map.layers().len(), 1);
    }

    #[test]
    fn single_load_replaces_previous_single() {
        let (mut map, mut loader) = setup();

        let first = loader.begin(LoadMode::Single("a".into()));
        loader.attach(&mut map, &first, "a", Ok(layer("a", 1.0, 1.0)));
        let second = loader.begin(LoadMode::Single("b".into()));
        loader.attach(&mut map, &second, "b", Ok(layer("b", 2.0, 2.0)));

        assert_eq!(loader.len(), 1);
        assert_eq!(loader.single_name(), Some("b"));
        assert_eq!(map.layers().len(), 1);
        assert_eq!(map.detached_count(), 0);
    }

    #[test]
    fn failed_single_load_attaches_nothing() {
        let (mut map, mut loader) = setup();
        let view = *map.view();
        let ticket = loader.begin(LoadMode::Single("a".into()));

        assert!(!loader.attach(&mut map, &ticket, "a", Err(GeolensError::Http(404))));
        assert!(loader.complete(&mut map, &ticket).is_none());
        assert!(loader.is_empty());
        assert_eq!(*map.view(), view);
    }

    #[test]
    fn load_all_tolerates_failures() {
        let (mut map, mut loader) = setup();
        let ticket = loader.begin(LoadMode::All(vec!["a".into(), "b".into(), "c".into()]));

        loader.attach(&mut map, &ticket, "a", Ok(layer("a", 39.0, 26.0)));
        loader.attach(&mut map, &ticket, "b", Err(GeolensError::IO));
        loader.attach(&mut map, &ticket, "c", Ok(layer("c", 41.0, 28.0)));

        let bounds = loader.complete(&mut map, &ticket).unwrap();
        assert_eq!(bounds, GeoRect::new(latlon!(39.0, 26.0), latlon!(41.0, 28.0)));
        assert_eq!(loader.all_names().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(map.layers().len(), 2);
    }

    #[test]
    fn empty_union_is_no_op() {
        let (mut map, mut loader) = setup();
        let view = *map.view();
        let ticket = loader.begin(LoadMode::All(vec!["a".into(), "empty".into()]));

        loader.attach(&mut map, &ticket, "a", Err(GeolensError::IO));
        let empty =
            FeatureLayer::from_slice("empty", br#"{"type":"FeatureCollection","features":[]}"#)
                .unwrap();
        assert!(loader.attach(&mut map, &ticket, "empty", Ok(empty)));

        assert!(loader.complete(&mut map, &ticket).is_none());
        assert_eq!(*map.view(), view);
    }

    #[test]
    fn clear_all_removes_everything() {
        let (mut map, mut loader) = setup();
        let single = loader.begin(LoadMode::Single("a".into()));
        loader.attach(&mut map, &single, "a", Ok(layer("a", 1.0, 1.0)));
        let all = loader.begin(LoadMode::All(vec!["b".into()]));
        loader.attach(&mut map, &all, "b", Ok(layer("b", 1.0, 1.0)));
        assert_eq!(loader.len(), 2);

        loader.clear_all(&mut map);
        assert!(loader.is_empty());
        assert!(map.layers().is_empty());
        assert_eq!(map.detached_count(), 0);
        assert_eq!(loader.generation(), 1);
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let (mut map, mut loader) = setup();
        let stale = loader.begin(LoadMode::Single("a".into()));
        loader.clear_all(&mut map);
        let current = loader.begin(LoadMode::Single("b".into()));

        assert!(loader.attach(&mut map, &current, "b", Ok(layer("b", 2.0, 2.0))));
        loader.complete(&mut map, &current);
        let view = *map.view();

        assert!(!loader.attach(&mut map, &stale, "a", Ok(layer("a", 1.0, 1.0))));
        assert!(loader.complete(&mut map, &stale).is_none());

        assert_eq!(loader.single_name(), Some("b"));
        assert_eq!(map.layers().len(), 1);
        assert_eq!(*map.view(), view);
    }

    #[test]
    fn ticket_names() {
        let loader = OverlayLoader::<LayerId>::new();
        let single = loader.begin(LoadMode::Single("a".into()));
        let all = loader.begin(LoadMode::All(vec!["b".into(), "c".into()]));
        assert_eq!(single.dataset_names(), ["a"]);
        assert_eq!(all.dataset_names(), ["b", "c"]);
    }
}
