use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::FetcherConfig;
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
    pub response_time_ms: u64,
    pub final_url: String, // After redirects
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// HTTP retrieval of one search page.
///
/// Non-200 responses are returned as pages; only transport failures
/// (DNS, TLS, timeout, connection reset) are errors.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// reqwest-backed fetcher with a fixed browser-like identity.
///
/// Built once per engine from [`FetcherConfig`]; headers, TLS trust, timeout
/// and the cookie jar do not change afterwards.
pub struct HttpFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(Self::browser_headers(&config)?)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .cookie_store(config.cookie_store)
            .timeout(config.timeout())
            .build()?;

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate validation is disabled for site fetches");
        }

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Headers a desktop Chrome sends on a top-level navigation.
    fn browser_headers(config: &FetcherConfig) -> Result<HeaderMap> {
        let pairs: [(HeaderName, &str); 9] = [
            (header::USER_AGENT, config.user_agent.as_str()),
            (
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
            ),
            (header::ACCEPT_LANGUAGE, config.accept_language.as_str()),
            (header::REFERER, config.referer.as_str()),
            (header::UPGRADE_INSECURE_REQUESTS, "1"),
            (HeaderName::from_static("sec-fetch-dest"), "document"),
            (HeaderName::from_static("sec-fetch-mode"), "navigate"),
            (HeaderName::from_static("sec-fetch-site"), "cross-site"),
            (HeaderName::from_static("sec-fetch-user"), "?1"),
        ];

        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            if value.is_empty() {
                continue;
            }
            let value = HeaderValue::from_str(value).map_err(|e| {
                AppError::Configuration(format!("Invalid value for header {}: {}", name, e))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let start_time = std::time::Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| AppError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| AppError::Fetch {
            url: url.to_string(),
            message: format!("failed to read body: {}", e),
        })?;

        tracing::debug!(
            "GET {} -> {} ({} bytes, {} ms)",
            url,
            status,
            body.len(),
            start_time.elapsed().as_millis()
        );

        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
            response_time_ms: start_time.elapsed().as_millis() as u64,
            final_url,
        })
    }
}
