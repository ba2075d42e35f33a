use regex::{Regex, RegexBuilder};
use url::Url;

use crate::config::constants::DEFAULT_PRODUCT_PATTERNS;

// * Decides whether a URL points at an individual product/listing page.
// * The pattern set is configuration, not business logic: the orchestrator
// * only ever sees the boolean answer.
pub struct ProductClassifier {
    patterns: Vec<Regex>,
}

impl ProductClassifier {
    // * Compiles an ordered set of case-insensitive patterns. Fails fast on a
    // * malformed pattern so a bad config never reaches the crawl loop.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| RegexBuilder::new(p.as_ref()).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    // * First match wins (logical OR). Never panics, even on non-URL garbage:
    // * unparseable input is matched as a raw string.
    pub fn is_product(&self, url: &str) -> bool {
        let target = match Url::parse(url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => url.to_string(),
        };
        self.patterns.iter().any(|re| re.is_match(&target))
    }
}

impl Default for ProductClassifier {
    fn default() -> Self {
        Self::from_patterns(DEFAULT_PRODUCT_PATTERNS)
            .expect("! CRITICAL: default product patterns must compile")
    }
}
