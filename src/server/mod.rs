// * HTTP API surface. Thin by design: validation and status mapping only,
// * all crawl logic lives in the engine.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, warn};

use crate::engine::errors::CrawlError;
use crate::engine::orchestrator::CrawlOrchestrator;
use crate::engine::results::ResultMap;
use crate::persistence::write_snapshot;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<CrawlOrchestrator>,
    pub snapshot_path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct CrawlRequest {
    pub domains: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn client_error(message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/crawl", post(crawl))
        .with_state(state)
}

async fn index() -> &'static str {
    "prospector product crawler is running"
}

// * POST /crawl { "domains": [...] } -> { pageURL: [productURL, ...] }
// * Invalid input is a client error; an unreachable page is not - the
// * response always carries whatever partial mapping was accumulated.
async fn crawl(
    State(state): State<AppState>,
    Json(request): Json<CrawlRequest>,
) -> Result<Json<ResultMap>, (StatusCode, Json<ErrorBody>)> {
    if request.domains.is_empty() {
        return Err(client_error("please provide a non-empty list of domains"));
    }

    match state.orchestrator.crawl(&request.domains).await {
        Ok(outcome) => {
            if outcome.fetch_failures > 0 {
                warn!(
                    fetch_failures = outcome.fetch_failures,
                    "crawl finished with partial results"
                );
            }
            if let Err(err) = write_snapshot(&state.snapshot_path, &outcome.pages).await {
                // * The snapshot is a side effect; the response still carries
                // * the results.
                warn!(%err, "failed to write result snapshot");
            }
            Ok(Json(outcome.pages))
        }
        Err(CrawlError::NoValidDomains) => Err(client_error("no valid domains provided")),
        Err(err) => {
            error!(%err, "crawl orchestration failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "an error occurred during crawling".to_string(),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;
    use crate::engine::classifier::ProductClassifier;
    use crate::network::errors::FetchError;
    use crate::network::PageFetcher;
    use crate::refinery::HtmlLinkExtractor;
    use async_trait::async_trait;

    struct FailingFetcher;

    #[async_trait]
    impl PageFetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            Err(FetchError::Status(503))
        }
    }

    struct OnePageFetcher;

    #[async_trait]
    impl PageFetcher for OnePageFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            Ok(r#"<a href="/product/1">p</a>"#.to_string())
        }
    }

    fn state(fetcher: Arc<dyn PageFetcher>, dir: &std::path::Path) -> AppState {
        let config = CrawlConfig {
            follow_links: false,
            crawl_budget_secs: Some(5),
            ..CrawlConfig::default()
        };
        AppState {
            orchestrator: Arc::new(CrawlOrchestrator::new(
                fetcher,
                Arc::new(HtmlLinkExtractor::new()),
                Arc::new(ProductClassifier::default()),
                config,
            )),
            snapshot_path: dir.join("productUrls.json"),
        }
    }

    #[tokio::test]
    async fn test_empty_domains_is_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(Arc::new(FailingFetcher), dir.path());
        let response = crawl(
            State(state),
            Json(CrawlRequest { domains: vec![] }),
        )
        .await;
        assert_eq!(response.unwrap_err().0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_all_invalid_domains_is_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(Arc::new(FailingFetcher), dir.path());
        let response = crawl(
            State(state),
            Json(CrawlRequest {
                domains: vec!["not a url".into(), "also-bad".into()],
            }),
        )
        .await;
        assert_eq!(response.unwrap_err().0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_successful_crawl_returns_mapping_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(Arc::new(OnePageFetcher), dir.path());
        let snapshot_path = state.snapshot_path.clone();

        let Json(pages) = crawl(
            State(state),
            Json(CrawlRequest {
                domains: vec!["https://shop.test/".into()],
            }),
        )
        .await
        .unwrap();

        assert_eq!(
            pages.get("https://shop.test/").unwrap(),
            &vec!["https://shop.test/product/1".to_string()]
        );
        assert!(snapshot_path.exists());
    }

    #[tokio::test]
    async fn test_unreachable_pages_still_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(Arc::new(FailingFetcher), dir.path());
        let Json(pages) = crawl(
            State(state),
            Json(CrawlRequest {
                domains: vec!["https://shop.test/".into()],
            }),
        )
        .await
        .unwrap();
        assert!(pages.is_empty());
    }
}
