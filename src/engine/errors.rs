use thiserror::Error;

// * Request-level failures. Per-page fetch and per-link normalization
// * errors are contained inside the crawl loop and never surface here.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("no valid seed domains after validation")]
    NoValidDomains,

    #[error("worker pool failure: {0}")]
    PoolFailure(String),
}
