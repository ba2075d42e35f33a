pub mod constants;

use serde::Deserialize;
use std::time::Duration;

use constants::{
    DEFAULT_CRAWL_BUDGET_SECS, DEFAULT_DELAY_MAX_MS, DEFAULT_DELAY_MIN_MS, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, DEFAULT_PRODUCT_PATTERNS, PAGE_TIMEOUT_MS,
};

// * Per-crawl configuration. Every field has a safe default so a partial
// * JSON document (or none at all) yields a working crawl.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    // * Number of concurrent worker slots draining the frontier
    pub max_concurrency: usize,

    // * Per-page fetch timeout in milliseconds
    pub page_timeout_ms: u64,

    // * Randomized politeness delay before each fetch; disabled when both are 0
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,

    // * Hard caps so a cyclic or calendar-trap link graph cannot run forever
    pub max_pages: usize,
    pub max_depth: usize,
    pub crawl_budget_secs: Option<u64>,

    // * When false, only the seed pages themselves are visited;
    // * discovered in-scope links are not followed recursively.
    pub follow_links: bool,

    // * Case-insensitive regex shapes for product URLs, swappable per crawl
    pub product_patterns: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            page_timeout_ms: PAGE_TIMEOUT_MS,
            delay_min_ms: DEFAULT_DELAY_MIN_MS,
            delay_max_ms: DEFAULT_DELAY_MAX_MS,
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            crawl_budget_secs: Some(DEFAULT_CRAWL_BUDGET_SECS),
            follow_links: true,
            product_patterns: DEFAULT_PRODUCT_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl CrawlConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    pub fn crawl_budget(&self) -> Option<Duration> {
        self.crawl_budget_secs.map(Duration::from_secs)
    }

    // * Returns the (min, max) delay bounds, or None when the delay is off
    pub fn delay_range(&self) -> Option<(u64, u64)> {
        if self.delay_max_ms == 0 && self.delay_min_ms == 0 {
            return None;
        }
        let lo = self.delay_min_ms.min(self.delay_max_ms);
        let hi = self.delay_min_ms.max(self.delay_max_ms);
        Some((lo, hi))
    }
}
