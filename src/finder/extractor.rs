//! Link Extractor
//!
//! Loads a product page and collects the outbound purchase links from its
//! buy areas, in document order and including duplicates. Never fails: any
//! problem yields an empty list.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::navigate_with_retry;
use super::types::SellerLink;
use crate::config::FinderConfig;
use crate::driver::PageDriver;
use crate::driver::wait::poll_until;
use crate::utils::absolutize;

/// Outbound purchase links of `product_url`; empty on any failure.
pub async fn extract_seller_links<D: PageDriver>(
    driver: &D,
    config: &FinderConfig,
    product_url: &str,
) -> Vec<SellerLink> {
    match try_extract(driver, config, product_url).await {
        Ok(links) => {
            info!("Extracted {} seller links from {product_url}", links.len());
            links
        }
        Err(e) => {
            warn!("Seller link extraction failed for {product_url}: {e:#}");
            Vec::new()
        }
    }
}

async fn try_extract<D: PageDriver>(
    driver: &D,
    config: &FinderConfig,
    product_url: &str,
) -> Result<Vec<SellerLink>> {
    navigate_with_retry(driver, config, product_url).await?;

    let selectors = config.selectors();
    let ready = poll_until(config.page_load_timeout(), config.poll_interval(), || async move {
        matches!(driver.find(None, &selectors.buy_area).await, Ok(Some(_)))
    })
    .await;
    if !ready {
        debug!("No buy area on {product_url}");
        return Ok(Vec::new());
    }

    let page_url = driver
        .current_url()
        .await
        .unwrap_or_else(|_| product_url.to_string());

    let mut links = Vec::new();
    let buy_areas = driver
        .find_all(None, &selectors.buy_area)
        .await
        .context("Failed to read buy areas")?;
    for area in &buy_areas {
        let anchors = driver
            .find_all(Some(area), &selectors.buy_link)
            .await
            .context("Failed to read buy links")?;
        for anchor in &anchors {
            let Some(href) = driver.attribute(anchor, "href").await? else {
                continue;
            };
            if href.trim().is_empty() {
                continue;
            }
            links.push(absolutize(&page_url, &href).unwrap_or(href));
        }
    }
    Ok(links)
}
