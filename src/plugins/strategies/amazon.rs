use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::models::{Listing, NewListing};
use crate::plugins::strategies::markup;
use crate::plugins::traits::{DEFAULT_MAX_ITEMS, ExtractContext, ExtractionStrategy};
use crate::utils::error::{AppError, Result};
use crate::utils::price;

pub const BASE_URL: &str = "https://www.amazon.com.br";
pub const SEARCH_URL: &str = "https://www.amazon.com.br/s?k=";

static RESULT_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.s-result-item").expect("static selector"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").expect("static selector"));
static PRICE_WHOLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.a-price-whole").expect("static selector"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("static selector"));
static NORMAL_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.a-link-normal").expect("static selector"));
static ANY_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));
static PRODUCT_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img.s-image").expect("static selector"));
static ANY_IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("static selector"));

/// Search results are scraped from markup only; the page carries no
/// embedded state with the result list.
pub struct AmazonStrategy {
    base_url: Url,
    max_items: usize,
}

impl AmazonStrategy {
    pub fn new() -> Self {
        Self {
            base_url: Url::parse(BASE_URL).expect("static base url"),
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    // Absolute, without tracking query string or fragment.
    fn clean_link(&self, href: &str) -> Option<String> {
        let mut url = markup::absolute_link(&self.base_url, href)?;
        url.set_query(None);
        url.set_fragment(None);
        Some(url.into())
    }
}

impl Default for AmazonStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for AmazonStrategy {
    fn site_name(&self) -> &str {
        "Amazon"
    }

    fn max_items(&self) -> usize {
        self.max_items
    }

    fn card_selector(&self) -> &Selector {
        &RESULT_ITEM
    }

    fn listing_from_card(&self, card: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Result<Listing> {
        // Sponsored slots and layout fillers carry no ASIN.
        if card.value().attr("data-asin").is_none_or(|asin| asin.trim().is_empty()) {
            return Err(AppError::parse("result slot without data-asin"));
        }

        let title = card
            .select(&TITLE)
            .next()
            .ok_or_else(|| AppError::parse("result without h2"))?;
        let name = markup::element_text(title);

        let price_element = card
            .select(&PRICE_WHOLE)
            .next()
            .ok_or_else(|| AppError::parse(format!("result '{}' without price", name)))?;
        let price = price::normalize(&markup::element_text(price_element));

        let link = markup::select_first(title, &[&*TITLE_LINK])
            .or_else(|| markup::select_first(card, &[&*NORMAL_LINK, &*ANY_LINK]))
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| self.clean_link(href));
        if link.is_none() {
            tracing::warn!("Amazon: empty link for product: {}", name);
        }

        let image = markup::select_first(card, &[&*PRODUCT_IMAGE, &*ANY_IMAGE])
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);

        Ok(Listing::new(NewListing {
            name,
            price,
            price_display: format!("R$ {:.2}", price),
            source_site: self.site_name().to_string(),
            link,
            image,
            retrieved_at: ctx.retrieved_at,
        }))
    }
}
