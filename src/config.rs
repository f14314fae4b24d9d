use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::plugins::registry::validate_site;
use crate::plugins::strategies::{amazon, magazine_luiza, StrategyKind};
use crate::plugins::traits::DEFAULT_MAX_ITEMS;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Every section falls back to its default, so partial files and an empty
/// environment still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetcher: FetcherConfig,
    pub search: SearchConfig,
    pub bot_wall: BotWallConfig,
    pub sites: Vec<SiteConfig>,
}

/// Client identity shared by every request of one engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub referer: String,
    /// Seconds.
    pub request_timeout: u64,
    /// Skips TLS certificate validation. Needed behind intercepting corporate
    /// proxies; leaves the connection open to impersonation.
    pub accept_invalid_certs: bool,
    pub cookie_store: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub politeness_delay_ms: u64,
    pub max_items_per_site: usize,
    pub default_top: usize,
    /// Drop listings whose price text could not be read instead of ranking them first.
    pub exclude_unpriced: bool,
    pub debug_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BotWallConfig {
    pub extra_phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub identifier: String,
    pub search_url: String,
    pub active: bool,
    pub strategy: StrategyKind,
    #[serde(default)]
    pub item_paths: Option<Vec<String>>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            referer: "https://www.google.com/".to_string(),
            request_timeout: 15,
            accept_invalid_certs: true,
            cookie_store: true,
        }
    }
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            politeness_delay_ms: 2000,
            max_items_per_site: DEFAULT_MAX_ITEMS,
            default_top: 5,
            exclude_unpriced: false,
            debug_dir: None,
        }
    }
}

impl SearchConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            search: SearchConfig::default(),
            bot_wall: BotWallConfig::default(),
            sites: vec![
                SiteConfig {
                    identifier: "magazine_luiza".to_string(),
                    search_url: magazine_luiza::SEARCH_URL.to_string(),
                    active: true,
                    strategy: StrategyKind::MagazineLuiza,
                    item_paths: None,
                },
                SiteConfig {
                    identifier: "amazon".to_string(),
                    search_url: amazon::SEARCH_URL.to_string(),
                    active: true,
                    strategy: StrategyKind::Amazon,
                    item_paths: None,
                },
            ],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Built-in defaults
            .add_source(Config::try_from(&AppConfig::default())?)
            // Shipped configuration
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "PRICE_SCOUT_"
            .add_source(
                Environment::with_prefix("PRICE_SCOUT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a single explicit file on top of the built-in defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name(path))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate fetcher configuration
        if self.fetcher.request_timeout == 0 {
            return Err(ConfigError::Message("Fetcher request_timeout must be greater than 0".into()));
        }

        if self.fetcher.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Fetcher user_agent must not be empty".into()));
        }

        // Validate search configuration
        if self.search.max_items_per_site == 0 {
            return Err(ConfigError::Message("Search max_items_per_site must be greater than 0".into()));
        }

        if self.search.default_top == 0 {
            return Err(ConfigError::Message("Search default_top must be greater than 0".into()));
        }

        // Validate sites
        let mut seen = HashSet::new();
        for site in &self.sites {
            if !seen.insert(site.identifier.as_str()) {
                return Err(ConfigError::Message(format!(
                    "Duplicate site identifier '{}'",
                    site.identifier
                )));
            }

            validate_site(&site.identifier, &site.search_url)
                .map_err(|e| ConfigError::Message(e.to_string()))?;

            if let Some(paths) = &site.item_paths {
                if !paths.is_empty() && !site.strategy.reads_embedded_state() {
                    return Err(ConfigError::Message(format!(
                        "Site '{}' uses a strategy without structured-data extraction; remove item_paths",
                        site.identifier
                    )));
                }

                if let Some(bad) = paths.iter().find(|p| !p.is_empty() && !p.starts_with('/')) {
                    return Err(ConfigError::Message(format!(
                        "Item path '{}' for site '{}' must be a JSON pointer starting with '/'",
                        bad, site.identifier
                    )));
                }
            }
        }

        Ok(())
    }
}
