//! Credits shown for the data sources of a layer.

use serde::{Deserialize, Serialize};

/// Text crediting the source of a layer's data, with an optional link to the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    text: String,
    #[serde(default)]
    url: Option<String>,
}

impl Attribution {
    /// Creates a new `Attribution` with the given text and optional URL.
    pub fn new(text: String, url: Option<String>) -> Self {
        Self { text, url }
    }

    /// Returns a reference to the text of the attribution.
    pub fn get_text(&self) -> &str {
        &self.text
    }

    /// Returns a reference to the URL associated with the attribution, if any.
    pub fn get_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Renders the attribution as an HTML fragment, linking the text if the URL is set.
    pub fn to_html(&self) -> String {
        match &self.url {
            Some(url) => format!("<a href=\"{url}\">{}</a>", self.text),
            None => self.text.clone(),
        }
    }
}
