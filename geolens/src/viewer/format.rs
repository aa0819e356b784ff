use std::fmt::{Display, Formatter};

/// Formats a distance in meters for display.
///
/// Distances under a kilometre are rounded to whole metres, longer ones are shown in kilometres
/// with two decimals. Halves are rounded up in both cases.
///
/// ```
/// use geolens::viewer::format_distance;
///
/// assert_eq!(format_distance(999.0), "999 metre");
/// assert_eq!(format_distance(1000.0), "1.00 kilometre");
/// ```
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} metre", meters.round())
    } else {
        format!("{:.2} kilometre", (meters / 10.0).round() / 100.0)
    }
}

/// Content of the measurement info box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InfoText {
    /// Measurement just started and there is nothing to show yet.
    Instructions,
    /// Total length of the measured path in meters.
    Total(f64),
}

impl InfoText {
    const INSTRUCTIONS: &'static str =
        "📏 Click on the map to measure. Press the measure button again to finish.";

    /// Renders the text as an HTML fragment with the distance in bold.
    pub fn to_html(&self) -> String {
        match self {
            InfoText::Instructions => Self::INSTRUCTIONS.to_string(),
            InfoText::Total(meters) => {
                format!("📏 Total distance: <strong>{}</strong>", format_distance(*meters))
            }
        }
    }
}

impl Display for InfoText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InfoText::Instructions => f.write_str(Self::INSTRUCTIONS),
            InfoText::Total(meters) => write!(f, "📏 Total distance: {}", format_distance(*meters)),
        }
    }
}
