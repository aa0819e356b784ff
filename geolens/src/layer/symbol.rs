//! Symbols define how shapes are drawn.

use serde::{Deserialize, Serialize};

use crate::Color;

/// Filled circle of a fixed screen size, drawn at a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePointSymbol {
    /// Color of the circle outline.
    pub color: Color,
    /// Color of the circle fill.
    pub fill_color: Color,
    /// Opacity of the fill in `[0, 1]` range.
    pub fill_opacity: f64,
    /// Radius of the circle in pixels.
    pub radius: f64,
}

impl CirclePointSymbol {
    /// Creates a new symbol with the same outline and fill color.
    pub fn new(color: Color, radius: f64) -> Self {
        Self {
            color,
            fill_color: color,
            fill_opacity: 1.0,
            radius,
        }
    }
}

impl Default for CirclePointSymbol {
    fn default() -> Self {
        Self::new(Color::ORANGE, 5.0)
    }
}

/// Stroke of a polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSymbol {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
    /// Stroke opacity in `[0, 1]` range.
    pub opacity: f64,
    /// Lengths of alternating dashes and gaps in pixels. Solid line if not set.
    #[serde(default)]
    pub dash_array: Option<Vec<f64>>,
}

impl LineSymbol {
    /// Dash pattern in the CSS `stroke-dasharray` form, e.g. `"5, 10"`.
    pub fn dash_pattern(&self) -> Option<String> {
        let dashes = self.dash_array.as_ref()?;
        if dashes.is_empty() {
            return None;
        }

        Some(
            dashes
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

impl Default for LineSymbol {
    fn default() -> Self {
        Self {
            color: Color::ORANGE,
            width: 3.0,
            opacity: 0.7,
            dash_array: Some(vec![5.0, 10.0]),
        }
    }
}
