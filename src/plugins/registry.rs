use std::fmt;
use std::sync::Arc;
use url::Url;

use super::traits::ExtractionStrategy;
use crate::models::SiteInfo;
use crate::utils::error::{AppError, Result};

/// Placeholder substituted with the encoded search term. Templates without it
/// get the term appended.
pub const QUERY_PLACEHOLDER: &str = "{query}";

pub type StrategyRef = Arc<dyn ExtractionStrategy>;

#[derive(Clone)]
pub struct SiteEntry {
    pub identifier: String,
    pub search_url_template: String,
    pub active: bool,
    pub strategy: StrategyRef,
}

impl SiteEntry {
    /// Search URL for `term`, form-encoded (spaces become `+`).
    pub fn search_url(&self, term: &str) -> String {
        build_search_url(&self.search_url_template, term)
    }

    pub fn info(&self) -> SiteInfo {
        SiteInfo {
            identifier: self.identifier.clone(),
            search_url: self.search_url_template.clone(),
            active: self.active,
        }
    }
}

impl fmt::Debug for SiteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteEntry")
            .field("identifier", &self.identifier)
            .field("search_url_template", &self.search_url_template)
            .field("active", &self.active)
            .field("strategy", &self.strategy.site_name())
            .finish()
    }
}

pub fn build_search_url(template: &str, term: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
    if template.contains(QUERY_PLACEHOLDER) {
        template.replace(QUERY_PLACEHOLDER, &encoded)
    } else {
        format!("{}{}", template, encoded)
    }
}

/// Checks identifier and template shape; returns the parsed sample URL.
///
/// Identifiers name debug artifacts on disk, so only ASCII letters, digits,
/// `_` and `-` are accepted.
pub fn validate_site(identifier: &str, url_template: &str) -> Result<Url> {
    let file_safe = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
    if identifier.is_empty() || !identifier.chars().all(file_safe) {
        return Err(AppError::Configuration(format!(
            "Invalid site identifier '{}': use only letters, digits, '_' and '-'",
            identifier
        )));
    }

    let sample = build_search_url(url_template, "probe");
    let url = Url::parse(&sample).map_err(|e| {
        AppError::Configuration(format!(
            "Malformed search URL template for '{}': {} ({})",
            identifier, url_template, e
        ))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Configuration(format!(
            "Search URL template for '{}' must be http or https: {}",
            identifier, url_template
        )));
    }

    Ok(url)
}

/// Ordered site table. Iteration order is registration order; replacing an
/// identifier keeps its position.
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    entries: Vec<SiteEntry>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Adds or replaces a site. New and replaced entries start active.
    pub fn register(
        &mut self,
        identifier: &str,
        url_template: &str,
        strategy: StrategyRef,
    ) -> Result<()> {
        validate_site(identifier, url_template)?;

        let entry = SiteEntry {
            identifier: identifier.to_string(),
            search_url_template: url_template.to_string(),
            active: true,
            strategy,
        };

        match self.entries.iter_mut().find(|e| e.identifier == identifier) {
            Some(existing) => {
                tracing::info!("Site '{}' replaced", identifier);
                *existing = entry;
            }
            None => {
                tracing::info!("Site '{}' registered", identifier);
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    pub fn set_active(&mut self, identifier: &str, active: bool) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.identifier == identifier)
            .ok_or_else(|| AppError::NotFound {
                resource: format!("site '{}'", identifier),
            })?;
        entry.active = active;
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Option<&SiteEntry> {
        self.entries.iter().find(|e| e.identifier == identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    pub fn entries(&self) -> &[SiteEntry] {
        &self.entries
    }

    /// Snapshot of the active entries in registry order.
    pub fn active_entries(&self) -> Vec<SiteEntry> {
        self.entries.iter().filter(|e| e.active).cloned().collect()
    }

    pub fn list(&self) -> Vec<SiteInfo> {
        self.entries.iter().map(SiteEntry::info).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
