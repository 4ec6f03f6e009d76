//! Service layer for the watcher.
//!
//! - Source page fetching (`PageFetcher`, `HttpFetcher`)
//! - Post extraction (`PostExtractor`)

mod extractor;
mod fetcher;

pub use extractor::PostExtractor;
pub use fetcher::{HttpFetcher, PageFetcher};
