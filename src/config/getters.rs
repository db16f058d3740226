//! Getter methods for `FinderConfig`

use std::path::PathBuf;
use std::time::Duration;

use super::types::{FinderConfig, SelectorSet};

impl FinderConfig {
    #[must_use]
    pub fn search_base_url(&self) -> &str {
        &self.search_base_url
    }

    /// Search URL for a seller: `<search-base>?query=<percent-encoded name>`
    #[must_use]
    pub fn search_url_for(&self, display_name: &str) -> String {
        format!(
            "{}?query={}",
            self.search_base_url,
            urlencoding::encode(display_name)
        )
    }

    #[must_use]
    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    #[must_use]
    pub fn indirection_hosts(&self) -> &[String] {
        &self.indirection_hosts
    }

    #[must_use]
    pub fn native_storefront_domain(&self) -> &str {
        &self.native_storefront_domain
    }

    #[must_use]
    pub fn alternate_marketplace_domain(&self) -> &str {
        &self.alternate_marketplace_domain
    }

    #[must_use]
    pub fn fashion_keywords(&self) -> &[String] {
        &self.fashion_keywords
    }

    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    #[must_use]
    pub fn redirect_settle_timeout(&self) -> Duration {
        Duration::from_secs(self.redirect_settle_timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }
}
