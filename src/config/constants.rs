// * Configuration Constants
// * Central location for all configurable thresholds, limits, and defaults

// * Worker pool size for a single crawl run
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

// * Page fetch timeout in milliseconds
pub const PAGE_TIMEOUT_MS: u64 = 30_000;

// * Politeness delay range in milliseconds (both 0 disables the delay)
pub const DEFAULT_DELAY_MIN_MS: u64 = 0;
pub const DEFAULT_DELAY_MAX_MS: u64 = 0;

// * Safety caps for unbounded same-origin link graphs (pagination traps etc.)
pub const DEFAULT_MAX_PAGES: usize = 500;
pub const DEFAULT_MAX_DEPTH: usize = 10;
pub const DEFAULT_CRAWL_BUDGET_SECS: u64 = 300;

// * HTTP API listen port when PORT is not set
pub const DEFAULT_PORT: u16 = 4000;

// * Snapshot file overwritten after every crawl run
pub const SNAPSHOT_FILE: &str = "productUrls.json";

// * Path shapes that mark a URL as an individual product/listing page.
// ! CRITICAL: Add new marketplace patterns here as they are discovered.
pub const DEFAULT_PRODUCT_PATTERNS: &[&str] = &[
    r"/product/",
    r"/item/",
    r"/p/",
    r"/dp/[A-Z0-9]+",
    r"/gp/product/[A-Z0-9]+",
];
