pub mod links;

pub use links::{HtmlLinkExtractor, LinkExtractor};
