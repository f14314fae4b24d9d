pub mod config;
pub mod engine;
pub mod fetcher;
pub mod models;
pub mod plugins;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use engine::SearchEngine;
pub use fetcher::{FetchedPage, HttpFetcher, PageFetcher};
pub use models::{Listing, SearchResult, SiteInfo, SiteOutcome, SiteReport};
pub use plugins::{ExtractionStrategy, SiteRegistry, StrategyKind};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
