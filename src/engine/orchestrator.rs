// * Crawl Orchestrator - drains the frontier with a bounded worker pool.
// * Per URL: claim -> politeness delay -> fetch -> extract -> classify ->
// * record/enqueue -> merge. A single page failure never aborts the crawl.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::CrawlConfig;
use crate::engine::classifier::ProductClassifier;
use crate::engine::errors::CrawlError;
use crate::engine::frontier::{Frontier, FrontierEntry, ScopePolicy};
use crate::engine::normalization::{normalize_seed, NormalizedUrl};
use crate::engine::results::{CrawlOutcome, PageResult, ResultSink};
use crate::network::PageFetcher;
use crate::refinery::LinkExtractor;

pub struct CrawlOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn LinkExtractor>,
    classifier: Arc<ProductClassifier>,
    config: CrawlConfig,
}

// * Everything one worker needs, cloned per task. All state is scoped to the
// * crawl run that created it; nothing lives in process-wide statics.
struct WorkerContext {
    frontier: Arc<Frontier>,
    scope: Arc<ScopePolicy>,
    sink: Arc<ResultSink>,
    failures: Arc<AtomicUsize>,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn LinkExtractor>,
    classifier: Arc<ProductClassifier>,
    config: CrawlConfig,
}

impl CrawlOrchestrator {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn LinkExtractor>,
        classifier: Arc<ProductClassifier>,
        config: CrawlConfig,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            classifier,
            config,
        }
    }

    // * Normalizes the caller-supplied seed list, dropping entries that do
    // * not parse as absolute http(s) URLs.
    pub fn validate_seeds(seeds: &[String]) -> Vec<NormalizedUrl> {
        let mut valid = Vec::new();
        for seed in seeds {
            match normalize_seed(seed) {
                Ok(url) => {
                    if !valid.contains(&url) {
                        valid.push(url);
                    }
                }
                Err(err) => warn!(%err, "dropping invalid seed domain"),
            }
        }
        valid
    }

    // * Runs a full crawl to convergence (or until a safety limit trips).
    pub async fn crawl(&self, seeds: &[String]) -> Result<CrawlOutcome, CrawlError> {
        // * The sender is held for the duration of the crawl and never fires,
        // * so the run is bounded only by the configured limits.
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        self.crawl_with_shutdown(seeds, shutdown_rx).await
    }

    // * Same as crawl(), but stops dequeuing new work as soon as the caller
    // * flips the shutdown signal. In-flight fetches drain and whatever was
    // * accumulated so far is finalized as a partial result.
    pub async fn crawl_with_shutdown(
        &self,
        seeds: &[String],
        shutdown: watch::Receiver<bool>,
    ) -> Result<CrawlOutcome, CrawlError> {
        let seeds = Self::validate_seeds(seeds);
        if seeds.is_empty() {
            return Err(CrawlError::NoValidDomains);
        }

        let frontier = Arc::new(Frontier::new(self.config.max_pages, self.config.max_depth));
        let scope = Arc::new(ScopePolicy::new(&seeds));
        let sink = Arc::new(ResultSink::new());
        let failures = Arc::new(AtomicUsize::new(0));

        info!(
            seeds = seeds.len(),
            workers = self.config.max_concurrency,
            "crawl starting"
        );

        for seed in &seeds {
            frontier
                .enqueue(FrontierEntry {
                    url: seed.clone(),
                    origin: seed.clone(),
                    depth: 0,
                })
                .await;
        }

        // * Wall-clock budget: cancel the frontier when it runs out.
        let watchdog = self.config.crawl_budget().map(|budget| {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move {
                tokio::time::sleep(budget).await;
                warn!(budget_secs = budget.as_secs(), "crawl budget exhausted, cancelling");
                frontier.cancel();
            })
        });

        // * Caller-supplied cancellation signal.
        let listener = {
            let frontier = Arc::clone(&frontier);
            let mut shutdown = shutdown;
            tokio::spawn(async move {
                loop {
                    if *shutdown.borrow() {
                        break;
                    }
                    if shutdown.changed().await.is_err() {
                        // * Sender dropped without firing; nothing to wait for.
                        futures::future::pending::<()>().await;
                    }
                }
                info!("shutdown signal received, cancelling frontier");
                frontier.cancel();
            })
        };

        let mut pool = JoinSet::new();
        for worker_id in 0..self.config.max_concurrency.max(1) {
            let ctx = WorkerContext {
                frontier: Arc::clone(&frontier),
                scope: Arc::clone(&scope),
                sink: Arc::clone(&sink),
                failures: Arc::clone(&failures),
                fetcher: Arc::clone(&self.fetcher),
                extractor: Arc::clone(&self.extractor),
                classifier: Arc::clone(&self.classifier),
                config: self.config.clone(),
            };
            pool.spawn(run_worker(worker_id, ctx));
        }

        let mut pool_error = None;
        while let Some(joined) = pool.join_next().await {
            if let Err(err) = joined {
                pool_error = Some(CrawlError::PoolFailure(err.to_string()));
            }
        }

        if let Some(watchdog) = watchdog {
            watchdog.abort();
        }
        listener.abort();

        if let Some(err) = pool_error {
            return Err(err);
        }

        let outcome = CrawlOutcome {
            pages: sink.finalize().await,
            fetch_failures: failures.load(Ordering::Relaxed),
        };

        let visited = frontier.visited_count().await;
        info!(
            visited,
            pages_with_products = outcome.pages.len(),
            fetch_failures = outcome.fetch_failures,
            cancelled = frontier.is_cancelled(),
            "crawl converged"
        );

        Ok(outcome)
    }
}

// * One worker slot. Loops until the frontier converges or is cancelled.
async fn run_worker(worker_id: usize, ctx: WorkerContext) {
    while let Some(entry) = ctx.frontier.next().await {
        // * Claim before fetching; losing the race just means another worker
        // * already owns this URL.
        if !ctx.frontier.try_claim(&entry.url).await {
            ctx.frontier.complete();
            continue;
        }

        debug!(worker_id, url = %entry.url, depth = entry.depth, "visiting");

        if let Some((lo, hi)) = ctx.config.delay_range() {
            tokio::time::sleep(std::time::Duration::from_millis(fastrand::u64(lo..=hi))).await;
        }

        visit_page(&ctx, &entry).await;

        // * Completion must follow any enqueues for this page, or the
        // * frontier could converge while links are still on the way.
        ctx.frontier.complete();
    }
    debug!(worker_id, "worker drained");
}

// * Fetch -> extract -> classify for a single claimed URL. Failures are
// * logged and counted; the subtree behind a failed page is simply not
// * discovered.
async fn visit_page(ctx: &WorkerContext, entry: &FrontierEntry) {
    let fetched = timeout(
        ctx.config.page_timeout(),
        ctx.fetcher.fetch(entry.url.as_str()),
    )
    .await;

    let html = match fetched {
        Ok(Ok(html)) => html,
        Ok(Err(err)) => {
            warn!(url = %entry.url, %err, "page fetch failed, abandoning URL");
            ctx.failures.fetch_add(1, Ordering::Relaxed);
            return;
        }
        Err(_) => {
            warn!(
                url = %entry.url,
                timeout_ms = ctx.config.page_timeout_ms,
                "page fetch timed out, abandoning URL"
            );
            ctx.failures.fetch_add(1, Ordering::Relaxed);
            return;
        }
    };

    let links = ctx.extractor.extract_links(&html, &entry.url);
    debug!(url = %entry.url, links = links.len(), "links extracted");

    let mut page = PageResult::new(entry.url.clone());
    for link in links {
        if ctx.classifier.is_product(link.as_str()) {
            // * Product links are recorded even when out of scope; they are
            // * results, not crawl targets.
            page.record(link);
        } else if ctx.config.follow_links && ctx.scope.allows(&entry.url, &link) {
            ctx.frontier
                .enqueue(FrontierEntry {
                    url: link,
                    origin: entry.url.clone(),
                    depth: entry.depth + 1,
                })
                .await;
        }
    }

    ctx.sink.merge(page).await;
}
