//! Connects the page controls to the viewer.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use geolens::config::ViewerConfig;
use geolens::control::{MouseButton, UserEvent};
use geolens::error::GeolensError;
use geolens::layer::data_provider::{DatasetProvider, UrlDatasetProvider};
use geolens::viewer::Selection;
use geolens::Viewer;
use geolens_types::geo::{GeoPoint2d, NewGeoPoint};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlOptionElement, HtmlSelectElement};

use crate::leaflet::LeafletMouseEvent;
use crate::surface::{js_error, ClickHandler, LeafletSurface};

/// Class of the measurement info box.
const INFO_BOX_CLASS: &str = "measure-info";
/// Background of the measure button while measuring.
const ACTIVE_BUTTON_BACKGROUND: &str = "#e0e0e0";
/// Background of the measure button when idle.
const IDLE_BUTTON_BACKGROUND: &str = "white";

/// Ids of the page elements the viewer is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageIds {
    /// Container of the map.
    pub map: String,
    /// `<select>` with the dataset names.
    pub selector: String,
    /// Button that returns to the home view.
    pub home_button: String,
    /// Button that switches the base layer.
    pub basemap_button: String,
    /// Button that starts and stops measuring.
    pub measure_button: String,
}

impl Default for PageIds {
    fn default() -> Self {
        Self {
            map: "map".to_string(),
            selector: "jsonSelector".to_string(),
            home_button: "homeButton".to_string(),
            basemap_button: "basemapToggle".to_string(),
            measure_button: "measureButton".to_string(),
        }
    }
}

/// Background color of the measure button.
pub fn measure_button_background(measuring: bool) -> &'static str {
    if measuring {
        ACTIVE_BUTTON_BACKGROUND
    } else {
        IDLE_BUTTON_BACKGROUND
    }
}

/// Viewer and the page elements it is connected to.
pub struct App {
    viewer: Viewer<LeafletSurface>,
    provider: Rc<UrlDatasetProvider>,
    document: Document,
    measure_button: HtmlElement,
    info_box: Option<HtmlElement>,
}

impl App {
    /// Creates the viewer in the page and registers the event listeners of the controls.
    pub fn start(config: ViewerConfig, page: PageIds) -> Result<Rc<RefCell<Self>>, GeolensError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| GeolensError::Wasm(Some("document is not available".into())))?;

        let selector: HtmlSelectElement = element(&document, &page.selector)?;
        let home_button: HtmlElement = element(&document, &page.home_button)?;
        let basemap_button: HtmlElement = element(&document, &page.basemap_button)?;
        let measure_button: HtmlElement = element(&document, &page.measure_button)?;

        let provider = Rc::new(config.dataset_provider()?);
        let surface = LeafletSurface::new(&page.map, &config)?;
        let mut viewer = Viewer::new(surface, config)?;
        if viewer.dataset_names().is_empty() {
            viewer.set_dataset_names(option_values(&selector));
        }

        let app = Rc::new(RefCell::new(Self {
            viewer,
            provider,
            document,
            measure_button,
            info_box: None,
        }));

        let click_handler: ClickHandler = Closure::new({
            let app = Rc::downgrade(&app);
            move |event: LeafletMouseEvent| on_map_click(&app, &event)
        });
        app.borrow_mut()
            .viewer
            .surface_mut()
            .set_click_handler(click_handler);

        listen(&selector, "change", {
            let app = app.clone();
            let selector = selector.clone();
            move || on_selection(&app, selector.value())
        })?;

        listen(&home_button, "click", {
            let app = app.clone();
            move || app.borrow_mut().viewer.go_home()
        })?;

        listen(&basemap_button, "click", {
            let app = app.clone();
            move || {
                app.borrow_mut().viewer.toggle_basemap();
            }
        })?;

        let measure_target = app.borrow().measure_button.clone();
        listen(&measure_target, "click", {
            let app = app.clone();
            move || {
                let mut app = app.borrow_mut();
                let measuring = app.viewer.toggle_measure();
                app.set_measure_button(measuring);
                app.update_info_box();
            }
        })?;

        log::info!("Viewer attached to #{}", page.map);
        Ok(app)
    }

    /// The viewer.
    pub fn viewer(&self) -> &Viewer<LeafletSurface> {
        &self.viewer
    }

    fn set_measure_button(&self, measuring: bool) {
        if let Err(err) = self
            .measure_button
            .style()
            .set_property("background-color", measure_button_background(measuring))
        {
            log::warn!("Failed to style the measure button: {err:?}");
        }
    }

    fn update_info_box(&mut self) {
        let info = self.viewer.info();
        if info.is_none() && self.info_box.is_none() {
            return;
        }

        let Some(info_box) = self.ensure_info_box() else {
            return;
        };

        let style = info_box.style();
        let result = match info {
            Some(info) => {
                info_box.set_inner_html(&info.to_html());
                style.set_property("display", "block")
            }
            None => style.set_property("display", "none"),
        };

        if let Err(err) = result {
            log::warn!("Failed to update the info box: {err:?}");
        }
    }

    /// Info box element, created on first use.
    fn ensure_info_box(&mut self) -> Option<HtmlElement> {
        if self.info_box.is_none() {
            match create_info_box(&self.document) {
                Ok(info_box) => self.info_box = Some(info_box),
                Err(err) => log::error!("Failed to create the info box: {err}"),
            }
        }

        self.info_box.clone()
    }
}

fn on_map_click(app: &Weak<RefCell<App>>, event: &LeafletMouseEvent) {
    let Some(app) = app.upgrade() else {
        return;
    };
    let Ok(mut app) = app.try_borrow_mut() else {
        log::warn!("Map click ignored, the viewer is busy");
        return;
    };

    let position = event.latlng();
    let button = event
        .original_event()
        .map(|event| MouseButton::from_dom_button(event.button()))
        .unwrap_or(MouseButton::Left);
    let point = GeoPoint2d::latlon(position.lat(), position.lng());

    app.viewer.handle_event(&UserEvent::Click(button, point));
    app.update_info_box();
}

/// Clears the overlays right away and loads the selected datasets in the background.
fn on_selection(app: &Rc<RefCell<App>>, value: String) {
    let (ticket, provider) = {
        let mut app = app.borrow_mut();
        let selection = Selection::parse(&value, &app.viewer.config().all_datasets_value);
        (app.viewer.select(&selection), app.provider.clone())
    };

    let Some(ticket) = ticket else {
        return;
    };

    let app = app.clone();
    wasm_bindgen_futures::spawn_local(async move {
        for name in ticket.dataset_names() {
            let result = provider.load(name).await;
            app.borrow_mut().viewer.attach_overlay(&ticket, name, result);
        }

        app.borrow_mut().viewer.complete_load(&ticket);
    });
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, GeolensError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| GeolensError::Configuration(format!("element #{id} not found")))?
        .dyn_into::<T>()
        .map_err(|_| GeolensError::Configuration(format!("element #{id} has unexpected type")))
}

fn option_values(selector: &HtmlSelectElement) -> Vec<String> {
    let options = selector.options();
    (0..options.length())
        .filter_map(|index| options.item(index))
        .filter_map(|option| option.dyn_into::<HtmlOptionElement>().ok())
        .map(|option| option.value())
        .collect()
}

fn create_info_box(document: &Document) -> Result<HtmlElement, GeolensError> {
    let info_box: HtmlElement = document
        .create_element("div")
        .map_err(js_error)?
        .unchecked_into();
    info_box.set_class_name(INFO_BOX_CLASS);
    document
        .body()
        .ok_or_else(|| GeolensError::Wasm(Some("document has no body".into())))?
        .append_child(&info_box)
        .map_err(js_error)?;

    Ok(info_box)
}

fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    mut handler: impl FnMut() + 'static,
) -> Result<(), GeolensError> {
    let callback: Closure<dyn FnMut(web_sys::Event)> =
        Closure::new(move |_event: web_sys::Event| handler());
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(js_error)?;
    callback.forget();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_ids_defaults_and_overrides() {
        let ids: PageIds =
            serde_json::from_str(r#"{ "map": "viewer", "homeButton": "home" }"#).unwrap();
        assert_eq!(ids.map, "viewer");
        assert_eq!(ids.home_button, "home");
        assert_eq!(ids.selector, "jsonSelector");
        assert_eq!(ids.basemap_button, "basemapToggle");
        assert_eq!(ids.measure_button, "measureButton");
    }

    #[test]
    fn measure_button_colors() {
        assert_eq!(measure_button_background(true), "#e0e0e0");
        assert_eq!(measure_button_background(false), "white");
    }
}
