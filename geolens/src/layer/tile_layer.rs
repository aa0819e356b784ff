//! Background tile layers.

use std::any::Any;
use std::collections::HashMap;

use crate::error::GeolensError;
use crate::layer::{Attribution, Layer};

/// Index of a tile in the standard web-mercator tile grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TileIndex {
    /// Column, counted from the antimeridian to the east.
    pub x: u32,
    /// Row, counted from the north edge to the south.
    pub y: u32,
    /// Zoom level.
    pub z: u8,
}

impl TileIndex {
    /// Creates a new index.
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }
}

/// Layer of prerendered tiles requested from a URL template.
///
/// The template uses `{z}`, `{x}` and `{y}` placeholders for the tile index and an optional
/// `{s}` placeholder for one of the configured subdomains (servers that host the same tiles).
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    url_template: String,
    subdomains: Vec<String>,
    max_zoom: u8,
    attribution: Option<Attribution>,
}

impl TileLayer {
    /// URL template of the layer.
    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Subdomains substituted for the `{s}` placeholder.
    pub fn subdomains(&self) -> &[String] {
        &self.subdomains
    }

    /// Maximum zoom level the tile source provides.
    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// Returns the URL of the tile with the given index.
    ///
    /// ```
    /// use geolens::layer::{TileIndex, TileLayerBuilder};
    ///
    /// let layer = TileLayerBuilder::new_osm().build()?;
    /// let url = layer.tile_url(TileIndex::new(4, 2, 3))?;
    /// assert_eq!(url, "https://a.tile.openstreetmap.org/3/4/2.png");
    /// # Ok::<(), geolens::error::GeolensError>(())
    /// ```
    pub fn tile_url(&self, index: TileIndex) -> Result<String, GeolensError> {
        let subdomain = if self.subdomains.is_empty() {
            String::new()
        } else {
            let position = (index.x as usize + index.y as usize) % self.subdomains.len();
            self.subdomains[position].clone()
        };

        let vars = HashMap::from([
            ("z".to_string(), index.z.to_string()),
            ("x".to_string(), index.x.to_string()),
            ("y".to_string(), index.y.to_string()),
            ("s".to_string(), subdomain),
            ("r".to_string(), String::new()),
        ]);

        strfmt::strfmt(&self.url_template, &vars).map_err(|err| {
            GeolensError::Configuration(format!(
                "invalid tile url template {}: {err}",
                self.url_template
            ))
        })
    }
}

impl Layer for TileLayer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn attribution(&self) -> Option<Attribution> {
        self.attribution.clone()
    }
}

/// Constructor for a [`TileLayer`].
///
/// ```
/// use geolens::layer::TileLayerBuilder;
///
/// let layer = TileLayerBuilder::new_rest("https://{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}")
///     .with_subdomains(["mt0", "mt1", "mt2", "mt3"])
///     .with_max_zoom(20)
///     .with_attribution("© Google".to_string(), None)
///     .build()?;
///
/// assert_eq!(layer.max_zoom(), 20);
/// # Ok::<(), geolens::error::GeolensError>(())
/// ```
pub struct TileLayerBuilder {
    url_template: String,
    subdomains: Vec<String>,
    max_zoom: u8,
    attribution: Option<Attribution>,
}

impl TileLayerBuilder {
    /// Default maximum zoom level.
    pub const DEFAULT_MAX_ZOOM: u8 = 18;

    /// Initializes a builder for a layer that requests tiles from the given url template.
    pub fn new_rest(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            subdomains: vec![],
            max_zoom: Self::DEFAULT_MAX_ZOOM,
            attribution: None,
        }
    }

    #[allow(rustdoc::bare_urls)]
    /// Initializes a builder for a tile layer with the Open Street Map source.
    ///
    /// It uses the "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png" URL pattern with `a`,
    /// `b` and `c` subdomains.
    pub fn new_osm() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            max_zoom: 19,
            attribution: Some(Attribution::new(
                "© OpenStreetMap".to_string(),
                Some("https://www.openstreetmap.org/copyright".to_string()),
            )),
        }
    }

    /// Sets the subdomains used in place of the `{s}` placeholder.
    pub fn with_subdomains(mut self, subdomains: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.subdomains = subdomains.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the maximum zoom level of the source.
    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    /// Sets the attribution with the given text and optional URL.
    pub fn with_attribution(mut self, text: String, url: Option<String>) -> Self {
        self.attribution = Some(Attribution::new(text, url));
        self
    }

    /// Consumes the builder and constructs the layer.
    ///
    /// Returns a configuration error if the template lacks one of `{z}`, `{x}` and `{y}`
    /// placeholders, contains unknown placeholders, or uses `{s}` without subdomains.
    pub fn build(self) -> Result<TileLayer, GeolensError> {
        let Self {
            url_template,
            subdomains,
            max_zoom,
            attribution,
        } = self;

        for placeholder in ["{z}", "{x}", "{y}"] {
            if !url_template.contains(placeholder) {
                return Err(GeolensError::Configuration(format!(
                    "tile url template {url_template} has no {placeholder} placeholder"
                )));
            }
        }

        if url_template.contains("{s}") && subdomains.is_empty() {
            return Err(GeolensError::Configuration(format!(
                "tile url template {url_template} uses {{s}} but no subdomains are set"
            )));
        }

        let layer = TileLayer {
            url_template,
            subdomains,
            max_zoom,
            attribution,
        };

        // Catches unknown placeholders and unbalanced braces.
        layer.tile_url(TileIndex::new(0, 0, 0))?;

        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use insta::assert_compact_debug_snapshot;

    use super::*;

    #[test]
    fn subdomains_rotate_with_index() {
        let layer = TileLayerBuilder::new_rest("https://{s}.example.com/{z}/{x}/{y}.png")
            .with_subdomains(["a", "b"])
            .build()
            .unwrap();

        assert_eq!(
            layer.tile_url(TileIndex::new(0, 0, 1)).unwrap(),
            "https://a.example.com/1/0/0.png"
        );
        assert_eq!(
            layer.tile_url(TileIndex::new(1, 0, 1)).unwrap(),
            "https://b.example.com/1/1/0.png"
        );
    }

    #[test]
    fn query_string_template() {
        let layer = TileLayerBuilder::new_rest("https://{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}")
            .with_subdomains(["mt0", "mt1", "mt2", "mt3"])
            .build()
            .unwrap();

        assert_eq!(
            layer.tile_url(TileIndex::new(2, 3, 4)).unwrap(),
            "https://mt1.google.com/vt/lyrs=s&x=2&y=3&z=4"
        );
    }

    #[test]
    fn missing_placeholder_fails_build() {
        let result = TileLayerBuilder::new_rest("https://example.com/{z}/{x}.png").build();
        assert_matches!(result, Err(GeolensError::Configuration(_)));
    }

    #[test]
    fn subdomain_placeholder_requires_subdomains() {
        let result = TileLayerBuilder::new_rest("https://{s}.example.com/{z}/{x}/{y}.png").build();
        assert_compact_debug_snapshot!(
            result,
            @r#"Err(Configuration("tile url template https://{s}.example.com/{z}/{x}/{y}.png uses {s} but no subdomains are set"))"#
        );
    }

    #[test]
    fn unknown_placeholder_fails_build() {
        let result = TileLayerBuilder::new_rest("https://example.com/{z}/{x}/{y}.png?key={key}").build();
        assert_matches!(result, Err(GeolensError::Configuration(_)));
    }

    #[test]
    fn osm_layer_has_attribution() {
        let layer = TileLayerBuilder::new_osm().build().unwrap();
        let attribution = layer.attribution().unwrap();
        assert_eq!(attribution.get_text(), "© OpenStreetMap");
        assert_eq!(layer.max_zoom(), 19);
    }
}
