//! Loads the sample datasets into a headless map, prints the resulting view and measures a path.
//!
//! Run with `RUST_LOG=debug cargo run --example headless` to see what the viewer does.

use anyhow::Result;
use geolens::config::ViewerConfig;
use geolens::control::{MouseButton, UserEvent};
use geolens::geolens_types::latlon;
use geolens::{MapBuilder, Viewer};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/data");
    let config = ViewerConfig {
        dataset_url: format!("{data_dir}/{{name}}"),
        datasets: vec![
            "districts.geojson".to_string(),
            "roads.geojson".to_string(),
            "missing.geojson".to_string(),
        ],
        ..Default::default()
    };
    let provider = config.dataset_provider()?;

    let map = MapBuilder::default()
        .with_max_zoom(config.max_zoom)
        .with_zoom_snap(config.zoom_snap)
        .build();
    let mut viewer = Viewer::new(map, config)?;

    if let Some(bounds) = viewer.select_value(&provider, "districts.geojson").await {
        log::info!("Single dataset extent: {bounds:?}");
    }

    viewer.select_value(&provider, "show-all").await;
    let view = viewer.surface().view();
    println!(
        "{} overlays shown, view center {:?} at zoom {}",
        viewer.overlay_count(),
        view.center(),
        view.zoom()
    );

    viewer.toggle_measure();
    for point in [latlon!(39.65, 27.88), latlon!(40.05, 27.40), latlon!(40.10, 26.90)] {
        viewer.handle_event(&UserEvent::Click(MouseButton::Left, point));
    }
    if let Some(info) = viewer.info() {
        println!("{info}");
    }
    viewer.toggle_measure();

    println!("Base layer: {:?}", viewer.toggle_basemap());

    Ok(())
}
