//! Platform service for native targets.

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};

use crate::error::GeolensError;
use crate::platform::PlatformService;

/// Platform service for native targets.
///
/// URLs with `http` or `https` scheme are requested with the HTTP client, anything else is
/// treated as a path in the local file system.
#[derive(Debug, Clone)]
pub struct NativePlatformService {
    http_client: reqwest::Client,
}

#[async_trait]
impl PlatformService for NativePlatformService {
    fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("geolens/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|err| {
                log::warn!("Failed to configure http client, using defaults: {err}");
                reqwest::Client::new()
            });

        Self { http_client }
    }

    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, GeolensError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.load_from_web(url).await
        } else {
            self.load_from_file(url)
        }
    }
}

impl NativePlatformService {
    async fn load_from_web(&self, url: &str) -> Result<Bytes, GeolensError> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            info!("Failed to load {url}: {status}");
            return Err(GeolensError::Http(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }

    fn load_from_file(&self, path: &str) -> Result<Bytes, GeolensError> {
        match std::fs::read(path) {
            Ok(data) => {
                debug!("Loaded {path} from file system");
                Ok(data.into())
            }
            Err(err) => {
                info!("Failed to read {path}: {err}");
                Err(GeolensError::IO)
            }
        }
    }
}
