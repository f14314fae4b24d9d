// End-to-end search passes over a mock store server.

use super::*;
use price_scout::{SearchEngine, SiteOutcome};
use rust_decimal::Decimal;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_stores(server: &MockServer, amazon_body: String) {
    Mock::given(method("GET"))
        .and(path("/busca/notebook+dell"))
        .respond_with(ResponseTemplate::new(200).set_body_string(magazine_luiza_page()))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("k", "notebook dell"))
        .respond_with(ResponseTemplate::new(200).set_body_string(amazon_body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_ranks_listings_from_both_stores() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_stores(&server, amazon_page()).await;

    let engine = SearchEngine::from_config(&get_test_config(&server.uri()))?;
    let result = engine.search("notebook dell").await;

    let ranked: Vec<(&str, Decimal)> = result
        .listings
        .iter()
        .map(|l| (l.source_site.as_str(), l.price))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("Amazon", Decimal::new(1899, 0)),
            ("Magazine Luiza", Decimal::new(29999, 1)),
            ("Magazine Luiza", Decimal::new(3899, 0)),
            ("Amazon", Decimal::new(5499, 0)),
        ]
    );

    let latitude = &result.listings[0];
    assert_eq!(latitude.name, "Notebook Dell Latitude");
    assert_eq!(latitude.price_display, "R$ 1899.00");
    assert_eq!(
        latitude.link.as_deref(),
        Some(format!("{}/Notebook-Dell-Latitude/dp/B0DELL0002", server.uri()).as_str())
    );

    let inspiron = &result.listings[2];
    assert_eq!(inspiron.price_display, "R$ 3.899,00");
    assert_eq!(
        inspiron.link.as_deref(),
        Some(format!("{}/notebook-dell-inspiron-15/p/ab12cd/", server.uri()).as_str())
    );
    assert_eq!(
        inspiron.image.as_deref(),
        Some("https://a-static.mlcdn.com.br/200x200/notebook-dell.jpg")
    );

    assert!(result.sites.iter().all(|r| r.outcome == SiteOutcome::Ok));
    assert_eq!(result.sites[0].listings, 2);
    assert_eq!(result.sites[1].listings, 2);
    Ok(())
}

#[tokio::test]
async fn test_bot_wall_on_one_store_keeps_the_other() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_stores(&server, bot_wall_page()).await;

    let engine = SearchEngine::from_config(&get_test_config(&server.uri()))?;
    let result = engine.search("notebook dell").await;

    assert_eq!(result.len(), 2);
    assert!(result.listings.iter().all(|l| l.source_site == "Magazine Luiza"));
    assert_eq!(result.sites[1].site, "amazon");
    assert_eq!(result.sites[1].outcome, SiteOutcome::BotWall);
    Ok(())
}

#[tokio::test]
async fn test_requests_carry_browser_identity() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("referer", "https://www.google.com/"))
        .and(header("sec-fetch-dest", "document"))
        .and(header("upgrade-insecure-requests", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(amazon_page()))
        .expect(2)
        .mount(&server)
        .await;

    let engine = SearchEngine::from_config(&get_test_config(&server.uri()))?;
    let result = engine.search("notebook dell").await;

    // Both stores get the Amazon fixture; only the Amazon strategy reads it.
    assert_eq!(result.sites[1].listings, 2);
    Ok(())
}

#[tokio::test]
async fn test_empty_store_page_is_saved_for_diagnostics() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busca/geladeira"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>layout novo</body></html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(amazon_page()))
        .mount(&server)
        .await;

    let debug_dir = tempfile::tempdir()?;
    let mut config = get_test_config(&server.uri());
    config.search.debug_dir = Some(debug_dir.path().to_path_buf());

    let engine = SearchEngine::from_config(&config)?;
    let result = engine.search("geladeira").await;

    assert_eq!(result.sites[0].outcome, SiteOutcome::Empty);
    let saved = std::fs::read_to_string(debug_dir.path().join("debug_magazine_luiza.html"))?;
    assert!(saved.contains("layout novo"));
    assert!(!debug_dir.path().join("debug_amazon.html").exists());
    Ok(())
}

#[tokio::test]
async fn test_snapshot_is_flat_listing_array() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_stores(&server, amazon_page()).await;

    let engine = SearchEngine::from_config(&get_test_config(&server.uri()))?;
    engine.search("notebook dell").await;
    let top = engine.top(3).await;

    let snapshot = serde_json::to_value(&top.listings)?;
    let records = snapshot.as_array().expect("array");
    assert_eq!(records.len(), 3);

    let mut keys: Vec<&str> = records[0]
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["image", "link", "name", "price", "price_display", "retrieved_at", "source_site"]
    );
    assert_eq!(records[0]["price"], serde_json::json!(1899.0));
    Ok(())
}
