//! Source page fetching

use async_trait::async_trait;
use shared::{FetchError, MirrorSource, UpdaterError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Downloads the text of a mirror source page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, source: &MirrorSource) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, source: &MirrorSource) -> Result<String, FetchError> {
        (**self).fetch(source).await
    }
}

/// `PageFetcher` backed by an HTTP client with a fixed per-request timeout
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> shared::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpdaterError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, source: &MirrorSource) -> Result<String, FetchError> {
        let network = |e: reqwest::Error| FetchError::Network {
            url: source.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(source.as_str()).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: source.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(network)?;
        debug!("Fetched {} bytes from {}", body.len(), source);
        Ok(body)
    }
}
