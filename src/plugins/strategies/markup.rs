use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

static NEXT_DATA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script#__NEXT_DATA__").expect("static selector"));

/// Concrete size substituted for `{w}`/`{h}` tokens in image URLs.
pub const IMAGE_PLACEHOLDER_SIZE: &str = "200";

/// Parses the server-rendered state carried by `<script id="__NEXT_DATA__">`.
pub fn embedded_state(document: &Html) -> Option<Value> {
    let script = document.select(&NEXT_DATA).next()?;
    let raw: String = script.text().collect();

    match serde_json::from_str(raw.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("Failed to parse __NEXT_DATA__ payload: {}", e);
            None
        }
    }
}

/// Returns the first non-empty array found at one of the JSON pointers.
pub fn first_item_array<'v>(state: &'v Value, pointers: &[String]) -> Option<&'v Vec<Value>> {
    pointers
        .iter()
        .filter_map(|pointer| state.pointer(pointer))
        .filter_map(Value::as_array)
        .find(|items| !items.is_empty())
}

/// Whitespace-collapsed text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First descendant matching any of the selectors, tried in order.
pub fn select_first<'a>(scope: ElementRef<'a>, selectors: &[&Selector]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| scope.select(selector).next())
}

/// First non-empty string among the object's keys, tried in order.
pub fn first_string<'v>(item: &'v Value, keys: &[&str]) -> Option<&'v str> {
    keys.iter()
        .filter_map(|key| item.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Resolves `href` against the site origin. Empty or unresolvable hrefs are absent.
pub fn absolute_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match base.join(href) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Could not resolve link '{}': {}", href, e);
            None
        }
    }
}

pub fn fill_image_placeholders(image: &str) -> String {
    image
        .replace("{w}", IMAGE_PLACEHOLDER_SIZE)
        .replace("{h}", IMAGE_PLACEHOLDER_SIZE)
}
