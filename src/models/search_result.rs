use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Listing;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum SiteOutcome {
    Ok,
    Empty,
    BotWall,
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteReport {
    pub site: String,
    pub listings: usize,
    pub outcome: SiteOutcome,
}

/// Listings of one search pass, ascending by price.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResult {
    pub term: String,
    pub listings: Vec<Listing>,
    pub sites: Vec<SiteReport>,
    pub searched_at: Option<DateTime<Utc>>,
}

impl SearchResult {
    /// Sorts `listings` by price and wraps them. The sort is stable, so equal
    /// prices keep site order and per-site extraction order.
    pub fn ranked(term: impl Into<String>, mut listings: Vec<Listing>, sites: Vec<SiteReport>) -> Self {
        listings.sort_by_key(|listing| listing.price);
        Self {
            term: term.into(),
            listings,
            sites,
            searched_at: Some(Utc::now()),
        }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn best(&self) -> Option<&Listing> {
        self.listings.first()
    }

    /// Copy of this result limited to the first `n` listings.
    pub fn top(&self, n: usize) -> SearchResult {
        SearchResult {
            term: self.term.clone(),
            listings: self.listings.iter().take(n).cloned().collect(),
            sites: self.sites.clone(),
            searched_at: self.searched_at,
        }
    }
}
