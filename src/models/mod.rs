use serde::{Deserialize, Serialize};

pub mod listing;
pub mod search_result;

// Re-exports for convenience
pub use listing::*;
pub use search_result::*;

/// Read-only view of a registry entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteInfo {
    pub identifier: String,
    pub search_url: String,
    pub active: bool,
}
