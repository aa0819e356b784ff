//! Error types used by the crate.

use geolens_types::error::GeoTypesError;
use thiserror::Error;

/// Geolens error type.
#[derive(Debug, Error)]
pub enum GeolensError {
    /// I/O error (network or file)
    #[error("failed to load data")]
    IO,
    /// Server responded with a non-success status.
    #[error("request failed with status {0}")]
    Http(u16),
    /// Error decoding data.
    #[error("failed to decode data: {0}")]
    Decoding(String),
    /// Error interacting with WASM runtime.
    #[error("wasm error: {0:?}")]
    Wasm(Option<String>),
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
}

impl From<geojson::Error> for GeolensError {
    fn from(value: geojson::Error) -> Self {
        Self::Decoding(value.to_string())
    }
}

impl From<GeoTypesError> for GeolensError {
    fn from(value: GeoTypesError) -> Self {
        Self::Decoding(value.to_string())
    }
}

impl From<serde_json::Error> for GeolensError {
    fn from(value: serde_json::Error) -> Self {
        Self::Configuration(value.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for GeolensError {
    fn from(_value: reqwest::Error) -> Self {
        Self::IO
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for GeolensError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        GeolensError::Wasm(Some(format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<js_sys::Object> for GeolensError {
    fn from(value: js_sys::Object) -> Self {
        GeolensError::Wasm(Some(format!("Failed to cast {value:?} into target type")))
    }
}
