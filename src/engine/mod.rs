pub mod classifier;
pub mod errors;
pub mod frontier;
pub mod normalization;
pub mod orchestrator;
pub mod results;

// * Re-exports for convenient access
pub use classifier::ProductClassifier;
pub use errors::CrawlError;
pub use frontier::{Frontier, FrontierEntry, ScopePolicy};
pub use normalization::{normalize, normalize_seed, InvalidUrl, NormalizedUrl};
pub use orchestrator::CrawlOrchestrator;
pub use results::{CrawlOutcome, PageResult, ResultMap, ResultSink};
