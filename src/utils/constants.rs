//! Shared configuration constants for storefinder
//!
//! Default marketplace contract values (hosts, selectors, timeouts) used by
//! `FinderConfig` when no override is supplied. Selectors are tied to the
//! marketplace's current markup and may break without notice.

/// Marketplace search endpoint; the display name is appended as `?query=`.
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://search.shopping.naver.com/search/all";

/// Hosts that answer outbound purchase clicks with a redirect.
pub const DEFAULT_INDIRECTION_HOSTS: &[&str] = &["cr.shopping.naver.com"];

/// Native storefront platform domain.
pub const DEFAULT_NATIVE_STOREFRONT_DOMAIN: &str = "smartstore.naver.com";

/// Alternate marketplace app domain.
pub const DEFAULT_ALTERNATE_MARKETPLACE_DOMAIN: &str = "zigzag.kr";

/// Keywords matched against host and path for the fashion channel.
pub const DEFAULT_FASHION_KEYWORDS: &[&str] = &["fashion", "clothing", "apparel", "style"];

/// Suffixes stripped (with everything after them) by domain normalization.
pub const KNOWN_TLD_SUFFIXES: &[&str] = &["com", "co.kr", "kr", "net", "org", "shop"];

// Search results markup
pub const RESULTS_CONTAINER_SELECTOR: &str = "div.basicList_list_basis__uNBZx";
pub const PRODUCT_ITEM_SELECTOR: &str = "div.product_item__MDtDF";
pub const PRODUCT_TITLE_SELECTOR: &str = "div.product_title__Mmw2K a";
pub const MALL_AREA_SELECTOR: &str = "div.product_mall_area___f3wo";
pub const MALL_TITLE_SELECTOR: &str = "div.product_mall_title__Xer1m";
pub const MALL_ENTRY_SELECTOR: &str = "li";
pub const PRODUCT_LINK_SELECTOR: &str = "div.product_info_area__xxCTi a";

// Product page markup
pub const BUY_AREA_SELECTOR: &str = ".productByMall_buy_area__B1VZO";
pub const ANCHOR_SELECTOR: &str = "a";

/// Script used to trigger lazy rendering of the remaining result items.
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Upper bound for waiting on a page to show its expected markup.
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 10;

/// Upper bound for an indirection link to leave its own address.
pub const DEFAULT_REDIRECT_SETTLE_TIMEOUT_SECS: u64 = 5;

/// Interval between readiness checks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Retries for a failed navigation (attempts = retries + 1).
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay for exponential backoff between navigation attempts.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Display name used when the input row has none.
pub const UNKNOWN_SELLER_NAME: &str = "Unknown";
