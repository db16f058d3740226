//! Core configuration types for seller channel discovery
//!
//! `FinderConfig` makes every marketplace contract value explicit: where to
//! search, which markup to read, which hosts redirect, and which domains and
//! keywords identify each channel.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::constants::{
    ANCHOR_SELECTOR, BUY_AREA_SELECTOR, DEFAULT_ALTERNATE_MARKETPLACE_DOMAIN,
    DEFAULT_FASHION_KEYWORDS, DEFAULT_INDIRECTION_HOSTS, DEFAULT_MAX_RETRIES,
    DEFAULT_NATIVE_STOREFRONT_DOMAIN, DEFAULT_PAGE_LOAD_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_REDIRECT_SETTLE_TIMEOUT_SECS, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_SEARCH_BASE_URL,
    MALL_AREA_SELECTOR, MALL_ENTRY_SELECTOR, MALL_TITLE_SELECTOR, PRODUCT_ITEM_SELECTOR,
    PRODUCT_LINK_SELECTOR, PRODUCT_TITLE_SELECTOR, RESULTS_CONTAINER_SELECTOR,
};

/// CSS selectors for the marketplace's search results and product pages.
///
/// Treat as a versioned external contract: the class names are generated by
/// the marketplace's build and change without notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSet {
    /// Container(s) wrapping the result list
    pub results_container: String,
    /// One product entry, scoped to a results container
    pub product_item: String,
    /// Title anchor, scoped to a product item
    pub product_title: String,
    /// Listed-sellers area, scoped to a product item
    pub mall_area: String,
    /// Seller title blocks holding the seller's anchor, scoped to the mall area
    pub mall_title: String,
    /// One listed seller, scoped to the mall area
    pub mall_entry: String,
    /// Anchor to the product page, scoped to a product item
    pub product_link: String,
    /// Purchase area on the product page
    pub buy_area: String,
    /// Anchors inside a purchase area
    pub buy_link: String,
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            results_container: RESULTS_CONTAINER_SELECTOR.to_string(),
            product_item: PRODUCT_ITEM_SELECTOR.to_string(),
            product_title: PRODUCT_TITLE_SELECTOR.to_string(),
            mall_area: MALL_AREA_SELECTOR.to_string(),
            mall_title: MALL_TITLE_SELECTOR.to_string(),
            mall_entry: MALL_ENTRY_SELECTOR.to_string(),
            product_link: PRODUCT_LINK_SELECTOR.to_string(),
            buy_area: BUY_AREA_SELECTOR.to_string(),
            buy_link: ANCHOR_SELECTOR.to_string(),
        }
    }
}

impl SelectorSet {
    /// All selectors with their field names, for validation messages.
    pub(crate) fn named(&self) -> [(&'static str, &str); 9] {
        [
            ("results_container", &self.results_container),
            ("product_item", &self.product_item),
            ("product_title", &self.product_title),
            ("mall_area", &self.mall_area),
            ("mall_title", &self.mall_title),
            ("mall_entry", &self.mall_entry),
            ("product_link", &self.product_link),
            ("buy_area", &self.buy_area),
            ("buy_link", &self.buy_link),
        ]
    }
}

/// Main configuration struct for a discovery run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Marketplace search endpoint, without query string.
    ///
    /// **INVARIANT:** an absolute http(s) URL (validated in builder).
    pub(crate) search_base_url: String,
    pub(crate) selectors: SelectorSet,

    /// Hosts whose links must be followed to find the real destination
    pub(crate) indirection_hosts: Vec<String>,
    pub(crate) native_storefront_domain: String,
    pub(crate) alternate_marketplace_domain: String,
    pub(crate) fashion_keywords: Vec<String>,

    /// Upper bound for a page to show its expected markup
    ///
    /// Default: 10 seconds
    pub(crate) page_load_timeout_secs: u64,

    /// Upper bound for an indirection link to leave its own address
    ///
    /// Default: 5 seconds
    pub(crate) redirect_settle_timeout_secs: u64,

    /// Interval between readiness checks
    ///
    /// Default: 200 ms
    pub(crate) poll_interval_ms: u64,

    /// Retries for a failed navigation (0 = single attempt)
    pub(crate) max_retries: u32,
    pub(crate) retry_base_delay_ms: u64,

    pub(crate) headless: bool,

    /// Chrome user data directory; a unique temp profile is used when unset
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            selectors: SelectorSet::default(),
            indirection_hosts: DEFAULT_INDIRECTION_HOSTS
                .iter()
                .map(ToString::to_string)
                .collect(),
            native_storefront_domain: DEFAULT_NATIVE_STOREFRONT_DOMAIN.to_string(),
            alternate_marketplace_domain: DEFAULT_ALTERNATE_MARKETPLACE_DOMAIN.to_string(),
            fashion_keywords: DEFAULT_FASHION_KEYWORDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            redirect_settle_timeout_secs: DEFAULT_REDIRECT_SETTLE_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            headless: true,
            chrome_data_dir: None,
        }
    }
}

impl FinderConfig {
    /// Load overrides from a JSON file; absent fields keep their defaults.
    ///
    /// The loaded values go through the same validation as the builder.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let loaded: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        super::builder::validate(&loaded)?;
        Ok(loaded)
    }
}
