use std::fmt;
use thiserror::Error;
use url::Url;

// * Raised when a discovered href (or seed) cannot become a crawlable URL.
// * Callers skip the link; normalization failures never abort a crawl.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid URL `{input}`: {reason}")]
pub struct InvalidUrl {
    pub input: String,
    pub reason: &'static str,
}

fn invalid(input: &str, reason: &'static str) -> InvalidUrl {
    InvalidUrl {
        input: input.to_string(),
        reason,
    }
}

// * The canonical identity key used everywhere: visited set, result keys,
// * frontier dedup. Two URLs are the same page iff their normalized forms
// * are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host_str(&self) -> Option<&str> {
        self.0.host_str()
    }

    // * Serialized origin, e.g. "https://shop.example.com"
    pub fn origin(&self) -> String {
        self.0.origin().ascii_serialization()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// * Resolves `href` against `base` into the canonical, comparable form.
// *
// * Logic:
// * 1. Join href with base (standard RFC 3986 resolution via the url crate).
// * 2. Reject anything that is not http/https (mailto:, javascript:, ...).
// * 3. Strip fragment and query. Both are dropped from the identity key;
// *    the original service keyed pages by path alone.
// *
// * The url crate already lowercases ASCII domain hosts during parsing, so
// * normalizing the same output twice is byte-stable.
pub fn normalize(href: &str, base: &str) -> Result<NormalizedUrl, InvalidUrl> {
    let trimmed = href.trim();
    if trimmed.is_empty() {
        return Err(invalid(href, "empty href"));
    }

    let base = Url::parse(base).map_err(|_| invalid(base, "base is not an absolute URL"))?;

    let mut joined = base
        .join(trimmed)
        .map_err(|_| invalid(trimmed, "does not resolve against base"))?;

    match joined.scheme() {
        "http" | "https" => {}
        _ => return Err(invalid(trimmed, "unsupported scheme")),
    }

    if joined.host_str().is_none() {
        return Err(invalid(trimmed, "URL has no host"));
    }

    joined.set_fragment(None);
    joined.set_query(None);

    Ok(NormalizedUrl(joined))
}

// * Validates a caller-supplied seed. Seeds must already be absolute; a bare
// * hostname without a scheme is rejected, matching request validation.
pub fn normalize_seed(seed: &str) -> Result<NormalizedUrl, InvalidUrl> {
    normalize(seed, seed)
}
