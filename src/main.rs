use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use prospector::config::constants::{DEFAULT_PORT, SNAPSHOT_FILE};
use prospector::config::CrawlConfig;
use prospector::engine::classifier::ProductClassifier;
use prospector::engine::orchestrator::CrawlOrchestrator;
use prospector::network::HttpFetcher;
use prospector::refinery::HtmlLinkExtractor;
use prospector::server::{router, AppState};

#[tokio::main]
async fn main() {
    // Initialize Telemetry
    tracing_subscriber::fmt()
        .with_env_filter("prospector=debug,info")
        .with_target(false)
        .json()
        .init();

    let config = CrawlConfig::default();

    let fetcher = match HttpFetcher::new(config.page_timeout_ms) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            tracing::error!(%err, "failed to build HTTP client");
            std::process::exit(1);
        }
    };

    let classifier = match ProductClassifier::from_patterns(&config.product_patterns) {
        Ok(classifier) => classifier,
        Err(err) => {
            tracing::error!(%err, "failed to compile product patterns");
            std::process::exit(1);
        }
    };

    let state = AppState {
        orchestrator: Arc::new(CrawlOrchestrator::new(
            Arc::new(fetcher),
            Arc::new(HtmlLinkExtractor::new()),
            Arc::new(classifier),
            config,
        )),
        snapshot_path: PathBuf::from(SNAPSHOT_FILE),
    };

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "prospector crawl service listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%err, %addr, "failed to bind listener");
            std::process::exit(1);
        }
    };

    if let Err(err) = axum::serve(listener, router(state)).await {
        tracing::error!(%err, "server exited with error");
        std::process::exit(1);
    }
}
