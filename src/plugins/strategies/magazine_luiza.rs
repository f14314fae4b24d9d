use scraper::{ElementRef, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

use crate::models::{Listing, NewListing};
use crate::plugins::strategies::markup;
use crate::plugins::traits::{DEFAULT_MAX_ITEMS, ExtractContext, ExtractionStrategy};
use crate::utils::error::{AppError, Result};
use crate::utils::price;

pub const BASE_URL: &str = "https://www.magazineluiza.com.br";
pub const SEARCH_URL: &str = "https://www.magazineluiza.com.br/busca/";

/// Known locations of the product array inside `__NEXT_DATA__`, newest layout first.
pub const DEFAULT_ITEM_PATHS: &[&str] = &[
    "/props/pageProps/data/search/products",
    "/props/pageProps/initialState/search/results/products",
];

static CARD: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-testid="product-card-container"]"#).expect("static selector")
});
static TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-testid="product-title"]"#).expect("static selector")
});
static HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").expect("static selector"));
static PRICE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-testid="price-value"]"#).expect("static selector")
});
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("static selector"));

pub struct MagazineLuizaStrategy {
    base_url: Url,
    item_paths: Vec<String>,
    max_items: usize,
}

impl MagazineLuizaStrategy {
    pub fn new() -> Self {
        Self {
            base_url: Url::parse(BASE_URL).expect("static base url"),
            item_paths: DEFAULT_ITEM_PATHS.iter().map(|p| p.to_string()).collect(),
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Replaces the embedded-state key paths (JSON pointers, tried in order).
    pub fn with_item_paths(mut self, paths: Vec<String>) -> Self {
        self.item_paths = paths;
        self
    }

    pub fn push_item_path(&mut self, path: impl Into<String>) {
        self.item_paths.push(path.into());
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    // `price` is either an object carrying the amount or the amount itself.
    fn raw_price(item: &Value) -> Option<&Value> {
        let present = |v: &&Value| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        };

        match item.get("price")? {
            Value::Object(fields) => ["price", "bestPrice"]
                .iter()
                .filter_map(|key| fields.get(*key))
                .find(present),
            flat => Some(flat).filter(present),
        }
    }

    fn resolve_link(&self, name: &str, href: Option<&str>) -> Option<String> {
        let link = href.and_then(|h| markup::absolute_link(&self.base_url, h));
        if link.is_none() {
            tracing::warn!("Empty link for product: {}", name);
        }
        link.map(String::from)
    }
}

impl Default for MagazineLuizaStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for MagazineLuizaStrategy {
    fn site_name(&self) -> &str {
        "Magazine Luiza"
    }

    fn max_items(&self) -> usize {
        self.max_items
    }

    fn item_paths(&self) -> &[String] {
        &self.item_paths
    }

    fn listing_from_item(&self, item: &Value, ctx: &ExtractContext<'_>) -> Result<Listing> {
        let name = item.get("title").and_then(Value::as_str).unwrap_or_default();

        let raw_price = Self::raw_price(item)
            .ok_or_else(|| AppError::parse(format!("record '{}' has no price", name)))?;
        let price = price::from_json_value(raw_price)
            .ok_or_else(|| AppError::parse(format!("record '{}' has a non-scalar price", name)))?;
        let price_display = match raw_price {
            Value::String(s) => format!("R$ {}", s.trim()),
            other => format!("R$ {}", other),
        };

        let link = self.resolve_link(name, markup::first_string(item, &["path", "url", "href"]));
        let image = markup::first_string(item, &["image"]).map(markup::fill_image_placeholders);

        Ok(Listing::new(NewListing {
            name: name.to_string(),
            price,
            price_display,
            source_site: self.site_name().to_string(),
            link,
            image,
            retrieved_at: ctx.retrieved_at,
        }))
    }

    fn card_selector(&self) -> &Selector {
        &CARD
    }

    fn listing_from_card(&self, card: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Result<Listing> {
        let name = markup::select_first(card, &[&*TITLE, &*HEADING])
            .map(markup::element_text)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::parse("card without title"))?;

        let price_text = markup::select_first(card, &[&*PRICE])
            .map(markup::element_text)
            .ok_or_else(|| AppError::parse(format!("card '{}' without price", name)))?;

        let href = card
            .value()
            .attr("href")
            .or_else(|| markup::select_first(card, &[&*ANCHOR]).and_then(|a| a.value().attr("href")));
        let link = self.resolve_link(&name, href);

        let image = markup::select_first(card, &[&*IMAGE])
            .and_then(|img| img.value().attr("src").or_else(|| img.value().attr("data-src")))
            .map(markup::fill_image_placeholders);

        Ok(Listing::new(NewListing {
            price: price::normalize(&price_text),
            price_display: price_text,
            name,
            source_site: self.site_name().to_string(),
            link,
            image,
            retrieved_at: ctx.retrieved_at,
        }))
    }
}
