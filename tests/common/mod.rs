//! Test utilities for the storefinder test suite
//!
//! Builds search and product pages in the marketplace's markup so the
//! pipeline can run against a `SnapshotDriver`.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use kodegen_tools_storefinder::config::FinderConfig;
use kodegen_tools_storefinder::driver::{PageDriver, SnapshotDriver, SnapshotElement};
use kodegen_tools_storefinder::finder::SellerRecord;

pub const SEARCH_BASE: &str = "https://search.test/search/all";

/// One product item on a search results page
#[allow(dead_code)]
pub struct Listing {
    pub title: String,
    pub product_href: Option<String>,
    /// One `li` per seller; `Some(href)` gives it a titled anchor
    pub sellers: Vec<Option<String>>,
}

#[allow(dead_code)]
impl Listing {
    pub fn new(title: &str, product_href: &str, seller_count: usize) -> Self {
        Self {
            title: title.to_string(),
            product_href: Some(product_href.to_string()),
            sellers: (0..seller_count)
                .map(|i| Some(format!("https://mall{i}.test/")))
                .collect(),
        }
    }

    pub fn with_seller(mut self, href: &str) -> Self {
        self.sellers.push(Some(href.to_string()));
        self
    }

    pub fn without_product_link(mut self) -> Self {
        self.product_href = None;
        self
    }
}

/// Fast timings and a native storefront domain of `smartstore.example`
#[allow(dead_code)]
pub fn test_config() -> FinderConfig {
    FinderConfig::builder()
        .search_base_url(SEARCH_BASE)
        .native_storefront_domain("smartstore.example")
        .page_load_timeout_secs(1)
        .redirect_settle_timeout_secs(1)
        .poll_interval_ms(1)
        .max_retries(0)
        .retry_base_delay_ms(0)
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn search_url(name: &str) -> String {
    format!("{SEARCH_BASE}?query={}", urlencoding::encode(name))
}

#[allow(dead_code)]
pub fn seller(id: i64, name: &str, url: &str) -> SellerRecord {
    SellerRecord::from_raw(Some(&id.to_string()), Some(name), Some("1"), Some(url))
}

/// Search results page holding `listings` in one results container
#[allow(dead_code)]
pub fn search_page(listings: &[Listing]) -> String {
    let mut items = String::new();
    for listing in listings {
        let mut malls = String::new();
        for seller in &listing.sellers {
            match seller {
                Some(href) => malls.push_str(&format!(
                    r#"<li><div class="product_mall_title__Xer1m"><a href="{href}">mall</a></div></li>"#
                )),
                None => malls.push_str("<li>mall</li>"),
            }
        }
        let info = listing
            .product_href
            .as_deref()
            .map(|href| {
                format!(r#"<div class="product_info_area__xxCTi"><a href="{href}">view</a></div>"#)
            })
            .unwrap_or_default();
        items.push_str(&format!(
            r#"<div class="product_item__MDtDF">
                <div class="product_title__Mmw2K"><a href="{href}" title="{title}">{title}</a></div>
                {info}
                <div class="product_mall_area___f3wo"><ul>{malls}</ul></div>
            </div>"#,
            href = listing.product_href.as_deref().unwrap_or("#"),
            title = listing.title,
        ));
    }
    format!(
        r#"<!DOCTYPE html><html><body>
            <div class="basicList_list_basis__uNBZx">{items}</div>
        </body></html>"#
    )
}

/// Product page with one buy area per link
#[allow(dead_code)]
pub fn product_page(links: &[&str]) -> String {
    let areas: String = links
        .iter()
        .map(|href| {
            format!(r#"<div class="productByMall_buy_area__B1VZO"><a href="{href}">buy</a></div>"#)
        })
        .collect();
    format!("<!DOCTYPE html><html><body>{areas}</body></html>")
}

/// Snapshot driver with faults a saved page cannot express: a renderer that
/// panics on one URL and a selector whose lookups always fail.
#[allow(dead_code)]
pub struct FaultyDriver {
    inner: SnapshotDriver,
    panic_on: Option<String>,
    broken_selector: Option<String>,
}

#[allow(dead_code)]
impl FaultyDriver {
    pub fn new(inner: SnapshotDriver) -> Self {
        Self {
            inner,
            panic_on: None,
            broken_selector: None,
        }
    }

    pub fn panicking_on(mut self, url: impl Into<String>) -> Self {
        self.panic_on = Some(url.into());
        self
    }

    pub fn breaking_selector(mut self, selector: impl Into<String>) -> Self {
        self.broken_selector = Some(selector.into());
        self
    }
}

#[async_trait]
impl PageDriver for FaultyDriver {
    type Element = SnapshotElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        if self.panic_on.as_deref() == Some(url) {
            panic!("renderer crashed on {url}");
        }
        self.inner.navigate(url).await
    }

    async fn current_url(&self) -> Result<String> {
        self.inner.current_url().await
    }

    async fn find_all(
        &self,
        scope: Option<&SnapshotElement>,
        selector: &str,
    ) -> Result<Vec<SnapshotElement>> {
        if self.broken_selector.as_deref() == Some(selector) {
            return Err(anyhow!("node is detached from document"));
        }
        self.inner.find_all(scope, selector).await
    }

    async fn attribute(&self, element: &SnapshotElement, name: &str) -> Result<Option<String>> {
        self.inner.attribute(element, name).await
    }

    async fn text(&self, element: &SnapshotElement) -> Result<Option<String>> {
        self.inner.text(element).await
    }

    async fn execute_script(&self, script: &str) -> Result<()> {
        self.inner.execute_script(script).await
    }

    async fn quit(&mut self) -> Result<()> {
        self.inner.quit().await
    }
}
