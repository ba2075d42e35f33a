// * Link Extraction - turns raw page HTML into the deduplicated set of
// * normalized URLs it references. Invalid hrefs are silently skipped.

use scraper::{Html, Selector};
use std::collections::HashSet;

use crate::engine::normalization::{normalize, NormalizedUrl};

// * The link-extraction capability the crawl engine depends on. Kept as a
// * trait seam so tests can hand-build link graphs without real HTML.
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, html: &str, base: &NormalizedUrl) -> HashSet<NormalizedUrl>;
}

pub struct HtmlLinkExtractor {
    anchor: Selector,
}

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self {
            anchor: Selector::parse("a[href]").expect("! CRITICAL: anchor selector must parse"),
        }
    }
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, html: &str, base: &NormalizedUrl) -> HashSet<NormalizedUrl> {
        let document = Html::parse_document(html);
        document
            .select(&self.anchor)
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter_map(|href| normalize(href, base.as_str()).ok())
            .collect()
    }
}
