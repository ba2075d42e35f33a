use thiserror::Error;

// * Unified Error type for the Network Layer. A fetch failure is isolated to
// * the page that triggered it; the orchestrator logs it and moves on.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),
}
