pub mod traits;
pub mod registry;
pub mod strategies;

pub use registry::{SiteEntry, SiteRegistry};
pub use strategies::StrategyKind;
pub use traits::{ExtractContext, ExtractionStrategy};
