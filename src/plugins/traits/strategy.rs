use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::models::Listing;
use crate::plugins::strategies::markup;
use crate::utils::error::{AppError, Result};

/// Records considered per page on either extraction path.
pub const DEFAULT_MAX_ITEMS: usize = 40;

/// Per-call data shared by every listing built from one page.
#[derive(Debug, Clone)]
pub struct ExtractContext<'a> {
    pub search_term: &'a str,
    pub retrieved_at: DateTime<Utc>,
}

impl<'a> ExtractContext<'a> {
    pub fn new(search_term: &'a str) -> Self {
        Self {
            search_term,
            retrieved_at: Utc::now(),
        }
    }
}

/// Turns one fetched search page into listings, one implementation per site family.
///
/// Implementors describe where records live (embedded-state JSON pointers, a
/// card selector) and how one record becomes a [`Listing`]; the provided
/// [`extract`](ExtractionStrategy::extract) runs the structured-data path and
/// falls back to markup scraping when it yields nothing.
pub trait ExtractionStrategy: Send + Sync {
    /// Display name stamped into `Listing::source_site`.
    fn site_name(&self) -> &str;

    fn max_items(&self) -> usize {
        DEFAULT_MAX_ITEMS
    }

    /// JSON pointers into the embedded page state, tried in order.
    fn item_paths(&self) -> &[String] {
        &[]
    }

    /// Builds a listing from one embedded-state record.
    fn listing_from_item(&self, _item: &Value, _ctx: &ExtractContext<'_>) -> Result<Listing> {
        Err(AppError::parse(format!(
            "{} has no structured-data extraction",
            self.site_name()
        )))
    }

    /// Selector of the per-listing container element on the results page.
    fn card_selector(&self) -> &Selector;

    /// Builds a listing from one container element.
    fn listing_from_card(&self, card: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Result<Listing>;

    fn extract_structured(&self, document: &Html, ctx: &ExtractContext<'_>) -> Vec<Listing> {
        if self.item_paths().is_empty() {
            return Vec::new();
        }

        let Some(state) = markup::embedded_state(document) else {
            return Vec::new();
        };

        let Some(items) = markup::first_item_array(&state, self.item_paths()) else {
            tracing::debug!("{}: embedded state carries no known item path", self.site_name());
            return Vec::new();
        };

        items
            .iter()
            .take(self.max_items())
            .filter_map(|item| match self.listing_from_item(item, ctx) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    tracing::debug!("{}: skipping structured record: {}", self.site_name(), e);
                    None
                }
            })
            .collect()
    }

    fn extract_markup(&self, document: &Html, ctx: &ExtractContext<'_>) -> Vec<Listing> {
        let cards: Vec<ElementRef> = document.select(self.card_selector()).collect();
        if cards.is_empty() {
            tracing::warn!("{}: no listing containers found on page", self.site_name());
            return Vec::new();
        }

        tracing::debug!("{}: {} listing containers on page", self.site_name(), cards.len());

        cards
            .into_iter()
            .take(self.max_items())
            .filter_map(|card| match self.listing_from_card(card, ctx) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    tracing::debug!("{}: skipping listing container: {}", self.site_name(), e);
                    None
                }
            })
            .collect()
    }

    fn extract(&self, page_body: &str, search_term: &str) -> Vec<Listing> {
        let document = Html::parse_document(page_body);
        let ctx = ExtractContext::new(search_term);

        let structured = self.extract_structured(&document, &ctx);
        if !structured.is_empty() {
            return structured;
        }

        self.extract_markup(&document, &ctx)
    }
}
