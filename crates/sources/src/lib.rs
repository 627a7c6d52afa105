//! # Mirror Updater Sources
//!
//! Discovery of registry mirrors from public pages.
//!
//! ## Components
//!
//! - `PageFetcher` / `HttpFetcher` - Download source pages
//! - `ExtractorRegistry` - Per-host mirror extraction strategies
//! - `aggregate` - Union of per-source results with fallback substitution

pub mod fetcher;
pub mod extractor;
pub mod aggregator;

pub use fetcher::{HttpFetcher, PageFetcher};
pub use extractor::{CsdnExtractor, ExtractorRegistry, MirrorExtractor, TencentCloudExtractor};
pub use aggregator::{aggregate, Aggregation};
