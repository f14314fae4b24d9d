// Registry changes made through the engine and their effect on later searches.

use super::*;
use price_scout::{AppError, SearchEngine, SiteOutcome, StrategyKind};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_sites_are_listed_in_registration_order() -> anyhow::Result<()> {
    let engine = SearchEngine::from_config(&price_scout::AppConfig::default())?;

    let sites = engine.sites().await;
    let ids: Vec<&str> = sites.iter().map(|s| s.identifier.as_str()).collect();
    assert_eq!(ids, vec!["magazine_luiza", "amazon"]);
    assert_eq!(sites[0].search_url, "https://www.magazineluiza.com.br/busca/");
    assert_eq!(sites[1].search_url, "https://www.amazon.com.br/s?k=");
    assert!(sites.iter().all(|s| s.active));
    Ok(())
}

#[tokio::test]
async fn test_deactivated_store_is_never_requested() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busca/notebook+dell"))
        .respond_with(ResponseTemplate::new(200).set_body_string(magazine_luiza_page()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(amazon_page()))
        .expect(0)
        .mount(&server)
        .await;

    let engine = SearchEngine::from_config(&get_test_config(&server.uri()))?;
    engine.set_site_active("amazon", false).await?;

    let result = engine.search("notebook dell").await;
    assert_eq!(result.len(), 2);
    assert_eq!(result.sites.len(), 1);
    assert!(!engine.sites().await[1].active);
    Ok(())
}

#[tokio::test]
async fn test_registered_site_with_query_placeholder() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "notebook dell"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(amazon_page()))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = get_test_config(&server.uri());
    config.sites.clear();
    let engine = SearchEngine::from_config(&config)?;

    let strategy = StrategyKind::Amazon.build(Url::parse(&server.uri())?, 1, None);
    engine
        .register_site("outlet", &format!("{}/search?q={{query}}&page=1", server.uri()), strategy)
        .await?;

    let result = engine.search("notebook dell").await;
    assert_eq!(result.len(), 1);
    assert_eq!(result.listings[0].name, "Notebook Gamer Dell G15");
    assert_eq!(result.sites[0].outcome, SiteOutcome::Ok);
    Ok(())
}

#[tokio::test]
async fn test_replacing_a_site_keeps_its_position() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/novo/notebook"))
        .respond_with(ResponseTemplate::new(200).set_body_string(magazine_luiza_page()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/busca/notebook"))
        .respond_with(ResponseTemplate::new(200).set_body_string(magazine_luiza_page()))
        .mount(&server)
        .await;

    let engine = SearchEngine::from_config(&get_test_config(&server.uri()))?;
    engine.set_site_active("amazon", false).await?;

    let strategy = StrategyKind::MagazineLuiza.build(Url::parse(&server.uri())?, 40, None);
    engine
        .register_site("amazon", &format!("{}/novo/", server.uri()), strategy)
        .await?;

    let sites = engine.sites().await;
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[1].identifier, "amazon");
    assert!(sites[1].active);

    let result = engine.search("notebook").await;
    assert_eq!(result.sites[1].listings, 2);
    assert!(result.listings.iter().all(|l| l.source_site == "Magazine Luiza"));
    Ok(())
}

#[tokio::test]
async fn test_configuration_errors_surface_to_caller() -> anyhow::Result<()> {
    let engine = SearchEngine::from_config(&price_scout::AppConfig::default())?;

    let strategy = StrategyKind::Amazon.build(Url::parse("https://www.amazon.com.br")?, 40, None);
    let err = engine.register_site("", "https://x.example/s?k=", strategy).await.unwrap_err();
    assert!(matches!(err, AppError::Configuration(_)));

    let err = engine.set_site_active("ebay", false).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
    Ok(())
}
