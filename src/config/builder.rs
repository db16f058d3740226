//! Type-safe builder for `FinderConfig` using the typestate pattern
//!
//! The search endpoint is the one value every run must state explicitly;
//! `build()` only exists once it has been set.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;

use super::types::FinderConfig;
use crate::utils::is_valid_url;

// Type states for the builder
pub struct WithSearchBase;

pub struct FinderConfigBuilder<State = ()> {
    pub(crate) config: FinderConfig,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for FinderConfigBuilder<()> {
    fn default() -> Self {
        Self {
            config: FinderConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl FinderConfig {
    /// Create a builder for configuring a `FinderConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> FinderConfigBuilder<()> {
        FinderConfigBuilder::default()
    }

    /// Reopen a loaded configuration for further overrides
    #[must_use]
    pub fn into_builder(self) -> FinderConfigBuilder<WithSearchBase> {
        FinderConfigBuilder {
            config: self,
            _phantom: PhantomData,
        }
    }
}

impl FinderConfigBuilder<()> {
    pub fn search_base_url(self, url: impl Into<String>) -> FinderConfigBuilder<WithSearchBase> {
        let url = url.into();
        let normalized = if url.starts_with("http://") || url.starts_with("https://") {
            url
        } else {
            format!("https://{url}")
        };

        let mut config = self.config;
        config.search_base_url = normalized.trim_end_matches('?').to_string();
        FinderConfigBuilder {
            config,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl FinderConfigBuilder<WithSearchBase> {
    pub fn build(self) -> Result<FinderConfig> {
        validate(&self.config)?;
        Ok(self.config)
    }
}

/// Reject configurations that would make every search fail silently.
pub(crate) fn validate(config: &FinderConfig) -> Result<()> {
    if !is_valid_url(&config.search_base_url) {
        return Err(anyhow!(
            "Search base URL must be an absolute http(s) URL, got '{}'",
            config.search_base_url
        ));
    }

    for (name, selector) in config.selectors.named() {
        scraper::Selector::parse(selector)
            .map_err(|e| anyhow!("Invalid CSS selector for {name} '{selector}': {e}"))?;
    }

    if config.native_storefront_domain.trim().is_empty() {
        return Err(anyhow!("Native storefront domain cannot be empty"));
    }
    if config.alternate_marketplace_domain.trim().is_empty() {
        return Err(anyhow!("Alternate marketplace domain cannot be empty"));
    }
    if config.poll_interval_ms == 0 {
        return Err(anyhow!("Poll interval must be greater than zero"));
    }
    if config.page_load_timeout_secs == 0 || config.redirect_settle_timeout_secs == 0 {
        return Err(anyhow!("Readiness timeouts must be greater than zero"));
    }

    Ok(())
}
