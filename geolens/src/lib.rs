//! Geolens is the core of a map viewer for GeoJSON datasets. It shows the datasets as overlays
//! over a street or satellite base map, and lets the user measure distances by clicking on the
//! map.
//!
//! # Quick start
//!
//! ```no_run
//! use geolens::config::ViewerConfig;
//! use geolens::{MapBuilder, Viewer};
//!
//! # tokio_test::block_on(async {
//! let config = ViewerConfig::from_json(r#"{ "datasets": ["roads.geojson", "parcels.geojson"] }"#)?;
//! let provider = config.dataset_provider()?;
//! let map = MapBuilder::default()
//!     .with_max_zoom(config.max_zoom)
//!     .with_zoom_snap(config.zoom_snap)
//!     .build();
//!
//! let mut viewer = Viewer::new(map, config)?;
//! viewer.select_value(&provider, "show-all").await;
//! println!("{} overlays loaded", viewer.overlay_count());
//! # Ok::<(), geolens::error::GeolensError>(())
//! # });
//! ```
//!
//! # Main components
//!
//! * [`Viewer`] owns the state of the application: which base layer is shown, which overlays
//!   are loaded and whether a measurement is in progress.
//! * [`MapSurface`] is the map widget the viewer draws on. The crate contains a headless
//!   implementation, [`Map`], that keeps [`layers`](layer) and the [`MapView`] in memory. The
//!   `geolens-web` crate implements the surface with Leaflet.
//! * [`DatasetProvider`](layer::data_provider::DatasetProvider) loads overlay datasets by name,
//!   over HTTP or from local files.
//! * [`controls`](control) describe user input the viewer reacts to.

mod color;
pub mod config;
pub mod control;
pub mod error;
pub mod layer;
pub mod map;
mod messenger;
mod platform;
mod surface;
mod view;
pub mod viewer;

pub use color::Color;
pub use map::{Map, MapBuilder};
pub use messenger::Messenger;
pub use surface::MapSurface;
pub use view::MapView;
pub use viewer::Viewer;

// Reexport geolens_types
pub use geolens_types;
