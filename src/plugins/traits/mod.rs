pub mod strategy;

pub use strategy::{ExtractContext, ExtractionStrategy, DEFAULT_MAX_ITEMS};
