//! Builder methods available for all states
//!
//! These setters can be called on the builder regardless of whether the
//! search endpoint has been set yet.

use std::path::PathBuf;

use super::builder::FinderConfigBuilder;
use super::types::SelectorSet;

impl<State> FinderConfigBuilder<State> {
    #[must_use]
    pub fn selectors(mut self, selectors: SelectorSet) -> Self {
        self.config.selectors = selectors;
        self
    }

    /// Replace the set of hosts treated as outbound-click redirectors
    #[must_use]
    pub fn indirection_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.indirection_hosts = hosts
            .into_iter()
            .map(|h| h.into().to_lowercase())
            .collect();
        self
    }

    #[must_use]
    pub fn native_storefront_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.native_storefront_domain = domain.into().to_lowercase();
        self
    }

    #[must_use]
    pub fn alternate_marketplace_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.alternate_marketplace_domain = domain.into().to_lowercase();
        self
    }

    #[must_use]
    pub fn fashion_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.fashion_keywords = keywords
            .into_iter()
            .map(|k| k.into().to_lowercase())
            .collect();
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.config.page_load_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn redirect_settle_timeout_secs(mut self, secs: u64) -> Self {
        self.config.redirect_settle_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    /// Retries after the first failed navigation attempt
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    #[must_use]
    pub fn retry_base_delay_ms(mut self, ms: u64) -> Self {
        self.config.retry_base_delay_ms = ms;
        self
    }

    /// Set browser headless mode (visible vs invisible browser window)
    ///
    /// Headed mode is handy when the marketplace markup changes and the
    /// selectors need to be re-derived by eye.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.chrome_data_dir = dir;
        self
    }
}
