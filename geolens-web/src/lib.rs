//! Browser front-end of the geolens viewer.
//!
//! The page loads Leaflet, creates the controls and calls the exported `start` function:
//!
//! ```js
//! import init, { start } from "./pkg/geolens_web.js";
//!
//! await init();
//! start({ datasets: ["roads.geojson", "parcels.geojson"], page: { selector: "jsonSelector" } });
//! ```
//!
//! Every field of the configuration is optional. Dataset names are read from the options of the
//! selector if the configuration does not list them.

use std::cell::RefCell;
use std::rc::Rc;

use geolens::config::ViewerConfig;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

pub mod controls;
pub mod leaflet;
pub mod surface;

pub use controls::{App, PageIds};
pub use surface::LeafletSurface;

/// Configuration passed to [`start`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Viewer settings.
    #[serde(flatten)]
    pub viewer: ViewerConfig,
    /// Ids of the page elements.
    pub page: PageIds,
}

thread_local! {
    static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
}

/// Creates the viewer in the page.
#[wasm_bindgen]
pub fn start(config: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger is already initialized");
    }

    let config: WebConfig = if config.is_undefined() || config.is_null() {
        WebConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };

    let app = App::start(config.viewer, config.page).map_err(|err| {
        log::error!("Failed to start the viewer: {err}");
        JsValue::from_str(&err.to_string())
    })?;

    APP.with(|cell| cell.replace(Some(app)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_config_reads_viewer_and_page() {
        let config: WebConfig = serde_json::from_str(
            r#"{ "datasets": ["a.geojson"], "zoom_snap": 1, "page": { "map": "viewer" } }"#,
        )
        .unwrap();

        assert_eq!(config.viewer.datasets, vec!["a.geojson"]);
        assert_eq!(config.viewer.zoom_snap, 1.0);
        assert_eq!(config.viewer.home.zoom, 8.0);
        assert_eq!(config.page.map, "viewer");
        assert_eq!(config.page.selector, "jsonSelector");
    }
}
