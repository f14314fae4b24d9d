// Shared fixtures for the integration suite: a configuration pointing both
// stores at one mock server, and canned result pages.

pub mod search_flow_tests;
pub mod site_management_tests;

use price_scout::config::{AppConfig, SiteConfig};
use price_scout::StrategyKind;
use serde_json::json;

/// Default configuration with every site served by `server_uri` and no delay.
pub fn get_test_config(server_uri: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.fetcher.request_timeout = 5;
    config.search.politeness_delay_ms = 0;
    config.sites = vec![
        SiteConfig {
            identifier: "magazine_luiza".to_string(),
            search_url: format!("{}/busca/", server_uri),
            active: true,
            strategy: StrategyKind::MagazineLuiza,
            item_paths: None,
        },
        SiteConfig {
            identifier: "amazon".to_string(),
            search_url: format!("{}/s?k=", server_uri),
            active: true,
            strategy: StrategyKind::Amazon,
            item_paths: None,
        },
    ];
    config
}

/// Magazine Luiza search page carrying its results in `__NEXT_DATA__`.
pub fn magazine_luiza_page() -> String {
    let state = json!({"props": {"pageProps": {"data": {"search": {"products": [
        {
            "title": "Notebook Dell Inspiron 15",
            "price": {"price": "3.899,00", "bestPrice": "3.599,00"},
            "path": "/notebook-dell-inspiron-15/p/ab12cd/",
            "image": "https://a-static.mlcdn.com.br/{w}x{h}/notebook-dell.jpg"
        },
        {
            "title": "Notebook Dell Vostro",
            "price": {"bestPrice": 2999.9},
            "path": "/notebook-dell-vostro/p/ef34gh/"
        }
    ]}}}}});

    format!(
        r#"<!DOCTYPE html><html><head><title>Busca</title>
<script id="__NEXT_DATA__" type="application/json">{}</script></head>
<body><div id="__next"></div></body></html>"#,
        state
    )
}

/// Amazon results page scraped from markup.
pub fn amazon_page() -> String {
    r#"<!DOCTYPE html><html><body><div class="s-main-slot">
<div class="s-result-item s-asin" data-asin="B0DELL0001">
  <h2><a class="a-link-normal" href="/Notebook-Dell-G15/dp/B0DELL0001/ref=sr_1_1?keywords=notebook+dell&amp;qid=17">
    <span>Notebook Gamer Dell G15</span></a></h2>
  <img class="s-image" src="https://m.media-amazon.com/images/I/g15.jpg">
  <span class="a-price"><span class="a-price-whole">5.499,</span><span class="a-price-fraction">00</span></span>
</div>
<div class="s-result-item" data-asin="">
  <h2>Patrocinado</h2>
</div>
<div class="s-result-item s-asin" data-asin="B0DELL0002">
  <h2><a href="/Notebook-Dell-Latitude/dp/B0DELL0002?th=1"><span>Notebook Dell Latitude</span></a></h2>
  <span class="a-price-whole">1.899</span>
</div>
</div></body></html>"#
        .to_string()
}

pub fn bot_wall_page() -> String {
    r#"<html><body><h4>Digite os caracteres que você vê abaixo</h4>
<p>Desculpe, precisamos ter certeza de que você não é um robô.</p></body></html>"#
        .to_string()
}
