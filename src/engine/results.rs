// * Result Aggregator - per-page product sets merged into one crawl-wide map.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::engine::normalization::NormalizedUrl;

// * The externally visible shape: visited page -> sorted product URLs.
pub type ResultMap = BTreeMap<String, Vec<String>>;

// * Product links found on a single visited page. Built exclusively by the
// * worker that fetched the page, then merged into the shared sink.
#[derive(Debug)]
pub struct PageResult {
    pub page: NormalizedUrl,
    pub products: BTreeSet<NormalizedUrl>,
}

impl PageResult {
    pub fn new(page: NormalizedUrl) -> Self {
        Self {
            page,
            products: BTreeSet::new(),
        }
    }

    pub fn record(&mut self, product: NormalizedUrl) {
        self.products.insert(product);
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// * Synchronized accumulator shared by the worker pool. Pages with zero
// * product links are never inserted, so the final map only carries pages
// * that actually yielded something.
pub struct ResultSink {
    pages: Mutex<HashMap<NormalizedUrl, BTreeSet<NormalizedUrl>>>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
        }
    }

    pub async fn merge(&self, result: PageResult) {
        if result.is_empty() {
            return;
        }
        let mut pages = self.pages.lock().await;
        pages
            .entry(result.page)
            .or_default()
            .extend(result.products);
    }

    // * Snapshot of the current state as the external ordered mapping.
    // * Idempotent: calling twice without intervening merges yields the
    // * same value.
    pub async fn finalize(&self) -> ResultMap {
        let pages = self.pages.lock().await;
        pages
            .iter()
            .map(|(page, products)| {
                (
                    page.to_string(),
                    products.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect()
    }
}

impl Default for ResultSink {
    fn default() -> Self {
        Self::new()
    }
}

// * Everything a caller gets back from one crawl run: the page -> products
// * mapping plus how many fetches failed along the way (partial success).
#[derive(Debug, Serialize)]
pub struct CrawlOutcome {
    pub pages: ResultMap,
    pub fetch_failures: usize,
}
