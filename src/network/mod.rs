pub mod client;
pub mod errors;
pub mod identity;

pub use client::{HttpFetcher, PageFetcher};
pub use errors::FetchError;
