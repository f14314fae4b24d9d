use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{AppConfig, SearchConfig};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::models::{Listing, SearchResult, SiteInfo, SiteOutcome, SiteReport};
use crate::plugins::registry::{validate_site, SiteEntry, SiteRegistry};
use crate::plugins::traits::ExtractionStrategy;
use crate::utils::bot_wall::BotWallDetector;
use crate::utils::error::{AppError, Result};

/// Runs one search term across every active site and keeps the ranked result.
///
/// Sites are visited one at a time in registry order with the politeness
/// delay between consecutive fetches. Any site-level failure, including a bot
/// wall, leaves that site without listings; `search` itself never fails.
/// Cloning shares the registry and the current result.
#[derive(Clone)]
pub struct SearchEngine {
    registry: Arc<RwLock<SiteRegistry>>,
    fetcher: Arc<dyn PageFetcher>,
    detector: BotWallDetector,
    settings: SearchConfig,
    current: Arc<RwLock<Arc<SearchResult>>>,
}

impl SearchEngine {
    /// Engine with an empty registry.
    pub fn new(fetcher: Arc<dyn PageFetcher>, settings: SearchConfig) -> Self {
        Self {
            registry: Arc::new(RwLock::new(SiteRegistry::new())),
            fetcher,
            detector: BotWallDetector::new(),
            settings,
            current: Arc::new(RwLock::new(Arc::new(SearchResult::default()))),
        }
    }

    pub fn with_detector(mut self, detector: BotWallDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetcher.clone())?;
        Self::from_config_with_fetcher(config, Arc::new(fetcher))
    }

    /// Builds the registry from `config.sites`, in order, resolving each
    /// site's links against the origin of its search URL.
    pub fn from_config_with_fetcher(config: &AppConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        config.validate()?;

        let mut registry = SiteRegistry::new();

        for site in &config.sites {
            let sample = validate_site(&site.identifier, &site.search_url)?;
            let base_url = Url::parse(&sample.origin().ascii_serialization())?;
            let strategy = site.strategy.build(
                base_url,
                config.search.max_items_per_site,
                site.item_paths.clone(),
            );

            registry.register(&site.identifier, &site.search_url, strategy)?;
            if !site.active {
                registry.set_active(&site.identifier, false)?;
            }
        }

        let detector = BotWallDetector::with_extra_phrases(&config.bot_wall.extra_phrases);

        Ok(Self {
            registry: Arc::new(RwLock::new(registry)),
            ..Self::new(fetcher, config.search.clone())
        }
        .with_detector(detector))
    }

    pub fn settings(&self) -> &SearchConfig {
        &self.settings
    }

    /// Adds a site, or replaces the one with the same identifier. The entry
    /// is active either way.
    pub async fn register_site(
        &self,
        identifier: &str,
        url_template: &str,
        strategy: Arc<dyn ExtractionStrategy>,
    ) -> Result<()> {
        self.registry.write().await.register(identifier, url_template, strategy)
    }

    pub async fn set_site_active(&self, identifier: &str, active: bool) -> Result<()> {
        self.registry.write().await.set_active(identifier, active)?;
        info!("Site '{}' {}", identifier, if active { "activated" } else { "deactivated" });
        Ok(())
    }

    pub async fn sites(&self) -> Vec<SiteInfo> {
        self.registry.read().await.list()
    }

    /// Searches every active site for `term` and replaces the current result.
    pub async fn search(&self, term: &str) -> Arc<SearchResult> {
        let term = term.trim();
        // Registry changes made while the pass runs apply to the next search.
        let sites = self.registry.read().await.active_entries();

        info!("Searching '{}' on {} active site(s)", term, sites.len());

        let mut listings = Vec::new();
        let mut reports = Vec::with_capacity(sites.len());

        for (index, site) in sites.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.settings.politeness_delay()).await;
            }

            let (site_listings, outcome) = self.search_site(site, term).await;
            reports.push(SiteReport {
                site: site.identifier.clone(),
                listings: site_listings.len(),
                outcome,
            });
            listings.extend(site_listings);
        }

        let result = Arc::new(SearchResult::ranked(term, listings, reports));
        info!("Search '{}' finished with {} listing(s)", term, result.len());

        *self.current.write().await = Arc::clone(&result);
        result
    }

    /// First `n` listings of the current result.
    pub async fn top(&self, n: usize) -> SearchResult {
        self.current.read().await.top(n)
    }

    pub async fn current(&self) -> Arc<SearchResult> {
        Arc::clone(&*self.current.read().await)
    }

    async fn search_site(&self, site: &SiteEntry, term: &str) -> (Vec<Listing>, SiteOutcome) {
        let url = site.search_url(term);
        info!("Searching {} ({})", site.identifier, url);

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("{}: {}", site.identifier, e);
                return (Vec::new(), SiteOutcome::Failed(e.to_string()));
            }
        };

        if !page.is_success() {
            let e = AppError::HttpStatus { url, status: page.status };
            warn!("{}: {}", site.identifier, e);
            return (Vec::new(), SiteOutcome::Failed(e.to_string()));
        }

        if self.detector.is_bot_wall_page(&page.body) {
            warn!("{}: verification page served instead of results", site.identifier);
            self.save_raw_page(site, &page.body).await;
            return (Vec::new(), SiteOutcome::BotWall);
        }

        let mut listings = site.strategy.extract(&page.body, term);

        if self.settings.exclude_unpriced {
            let before = listings.len();
            listings.retain(|listing| !listing.is_unpriced());
            if listings.len() < before {
                debug!("{}: dropped {} unpriced listing(s)", site.identifier, before - listings.len());
            }
        }

        if listings.is_empty() {
            warn!("{}: no listings extracted", site.identifier);
            self.save_raw_page(site, &page.body).await;
            return (listings, SiteOutcome::Empty);
        }

        info!("{}: {} listing(s)", site.identifier, listings.len());
        (listings, SiteOutcome::Ok)
    }

    async fn save_raw_page(&self, site: &SiteEntry, body: &str) {
        if let Some(dir) = &self.settings.debug_dir {
            write_debug_artifact(dir, &site.identifier, body).await;
        }
    }
}

async fn write_debug_artifact(dir: &Path, identifier: &str, body: &str) {
    let path = dir.join(format!("debug_{}.html", identifier));

    let written = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, body).await
    }
    .await;

    match written {
        Ok(()) => info!("Raw page saved to {}", path.display()),
        Err(e) => warn!("Could not save raw page to {}: {}", path.display(), e),
    }
}
