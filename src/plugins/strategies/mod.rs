// Site extraction strategy implementations
pub mod amazon;
pub mod magazine_luiza;
pub mod markup;

pub use amazon::AmazonStrategy;
pub use magazine_luiza::MagazineLuizaStrategy;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

use crate::plugins::traits::ExtractionStrategy;

/// Strategy families selectable from configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    MagazineLuiza,
    Amazon,
}

impl StrategyKind {
    /// Whether the family can read records out of embedded page state, and so
    /// makes use of configured `item_paths`.
    pub fn reads_embedded_state(self) -> bool {
        matches!(self, StrategyKind::MagazineLuiza)
    }

    /// Builds the strategy for a site whose links resolve against `base_url`.
    /// `item_paths`, when given, replaces the family's embedded-state key paths;
    /// families that do not read embedded state ignore it.
    pub fn build(
        self,
        base_url: Url,
        max_items: usize,
        item_paths: Option<Vec<String>>,
    ) -> Arc<dyn ExtractionStrategy> {
        match self {
            StrategyKind::MagazineLuiza => {
                let mut strategy = MagazineLuizaStrategy::new()
                    .with_base_url(base_url)
                    .with_max_items(max_items);
                if let Some(paths) = item_paths {
                    strategy = strategy.with_item_paths(paths);
                }
                Arc::new(strategy)
            }
            StrategyKind::Amazon => Arc::new(
                AmazonStrategy::new()
                    .with_base_url(base_url)
                    .with_max_items(max_items),
            ),
        }
    }
}
