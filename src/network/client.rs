use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::network::errors::FetchError;
use crate::network::identity::IdentityProfile;

// * The page-fetch capability the crawl engine depends on. Production uses
// * HttpFetcher; tests inject deterministic stubs.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

// * The Primary HTTP Engine. One client instance is shared by the whole
// * worker pool so connections are pooled and released together.
pub struct HttpFetcher {
    inner: Client,
}

impl HttpFetcher {
    // * Initializes the client with the fixed Chrome identity and a hard
    // * navigation timeout. @param timeout_ms - per-request deadline.
    pub fn new(timeout_ms: u64) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        IdentityProfile::chrome_stable().apply_to_headers(&mut headers);

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self { inner: client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.inner.get(url).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        debug!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}
