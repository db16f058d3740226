//! Candidate Selector
//!
//! Searches the marketplace for a seller, reads every product item and picks
//! the listing with the most co-listed sellers. While scanning, each item's
//! seller list is checked against the declared homepage domain; a hit is the
//! owned-domain signal, reported regardless of which listing is chosen.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use super::navigate_with_retry;
use super::types::{ListingCandidate, SearchSelection};
use crate::config::FinderConfig;
use crate::driver::PageDriver;
use crate::driver::wait::poll_until;
use crate::utils::constants::SCROLL_TO_BOTTOM_SCRIPT;
use crate::utils::{absolutize, safe_truncate_chars, site_name};

const UNTITLED: &str = "(untitled)";

/// Search for `display_name` and pick the representative listing.
///
/// Navigation failures (after retries) are returned to the caller. A page
/// without result containers or items is an empty selection, not an error.
pub async fn find_candidate<D: PageDriver>(
    driver: &D,
    config: &FinderConfig,
    display_name: &str,
    declared_url: &str,
) -> Result<SearchSelection> {
    let search_url = config.search_url_for(display_name);
    info!("Searching marketplace for '{display_name}'");
    navigate_with_retry(driver, config, &search_url)
        .await
        .with_context(|| format!("Search for '{display_name}' failed"))?;

    let selectors = config.selectors();
    let results_ready = poll_until(config.page_load_timeout(), config.poll_interval(), || async move {
        matches!(driver.find(None, &selectors.results_container).await, Ok(Some(_)))
    })
    .await;
    if !results_ready {
        warn!("No result containers for '{display_name}'");
        return Ok(SearchSelection::default());
    }

    settle_lazy_items(driver, config).await;

    let page_url = driver.current_url().await.unwrap_or_default();
    let declared = site_name(declared_url);

    let containers = driver
        .find_all(None, &selectors.results_container)
        .await
        .context("Failed to read result containers")?;
    let mut items = Vec::new();
    for container in &containers {
        items.extend(
            driver
                .find_all(Some(container), &selectors.product_item)
                .await
                .context("Failed to read product items")?,
        );
    }
    info!("Found {} product items for '{display_name}'", items.len());

    let mut candidates = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match read_listing(driver, config, item, &page_url, &declared).await {
            Ok(Some(candidate)) => {
                debug!(
                    "Item {}: '{}' with {} sellers{}",
                    idx + 1,
                    safe_truncate_chars(&candidate.title, 60),
                    candidate.seller_link_count,
                    if candidate.owned_domain_match_url.is_some() {
                        " (owned domain listed)"
                    } else {
                        ""
                    }
                );
                candidates.push(candidate);
            }
            Ok(None) => debug!("Item {} skipped: no title or seller list", idx + 1),
            Err(e) => warn!("Item {} skipped: {e:#}", idx + 1),
        }
    }

    let selection = select_from(&candidates);
    match (&selection.product_url, &selection.title) {
        (Some(url), Some(title)) => info!("Selected listing '{title}': {url}"),
        _ => info!("No listing with a product link for '{display_name}'"),
    }
    if let Some(owned) = &selection.owned_domain_match_url {
        info!("Owned domain listed by a seller: {owned}");
    }
    Ok(selection)
}

/// Scroll to the bottom and wait for the item count to stop changing.
async fn settle_lazy_items<D: PageDriver>(driver: &D, config: &FinderConfig) {
    if let Err(e) = driver.execute_script(SCROLL_TO_BOTTOM_SCRIPT).await {
        warn!("Scroll trigger failed: {e:#}");
        return;
    }

    let item_selector = config.selectors().product_item.as_str();
    let previous = AtomicUsize::new(usize::MAX);
    let last_count = &previous;
    let stable = poll_until(config.page_load_timeout(), config.poll_interval(), || async move {
        let count = driver
            .find_all(None, item_selector)
            .await
            .map(|items| items.len())
            .unwrap_or(0);
        last_count.swap(count, Ordering::SeqCst) == count
    })
    .await;
    if !stable {
        debug!("Item count still changing after scroll; continuing");
    }
}

/// Read one product item. `Ok(None)` when it lacks a title or seller list.
async fn read_listing<D: PageDriver>(
    driver: &D,
    config: &FinderConfig,
    item: &D::Element,
    page_url: &str,
    declared: &str,
) -> Result<Option<ListingCandidate>> {
    let selectors = config.selectors();

    let Some(title_element) = driver.find(Some(item), &selectors.product_title).await? else {
        return Ok(None);
    };
    let title = match driver.attribute(&title_element, "title").await? {
        Some(title) if !title.trim().is_empty() => title.trim().to_string(),
        _ => driver
            .text(&title_element)
            .await?
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string()),
    };

    let Some(mall_area) = driver.find(Some(item), &selectors.mall_area).await? else {
        return Ok(None);
    };

    let owned_domain_match_url = if declared.is_empty() {
        None
    } else {
        match scan_owned_domain(driver, config, &mall_area, page_url, declared).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Owned domain scan failed for '{title}': {e:#}");
                None
            }
        }
    };

    // A failed count must not discard an owned signal already found
    let seller_link_count = match driver.find_all(Some(&mall_area), &selectors.mall_entry).await {
        Ok(entries) => entries.len(),
        Err(e) => {
            warn!("Seller count unavailable for '{title}': {e:#}");
            0
        }
    };

    let product_url = match driver.find(Some(item), &selectors.product_link).await {
        Ok(Some(link)) => driver
            .attribute(&link, "href")
            .await
            .ok()
            .flatten()
            .and_then(|href| absolutize(page_url, &href)),
        Ok(None) => None,
        Err(e) => {
            debug!("No product link for '{title}': {e:#}");
            None
        }
    };

    Ok(Some(ListingCandidate {
        product_url,
        title,
        seller_link_count,
        owned_domain_match_url,
    }))
}

/// First seller link in the item whose site name contains `declared`.
///
/// Links are resolved against the results page before comparing, the way a
/// browser reports `href`.
async fn scan_owned_domain<D: PageDriver>(
    driver: &D,
    config: &FinderConfig,
    mall_area: &D::Element,
    page_url: &str,
    declared: &str,
) -> Result<Option<String>> {
    let selectors = config.selectors();
    for mall_title in driver.find_all(Some(mall_area), &selectors.mall_title).await? {
        let Some(link) = driver.find(Some(&mall_title), "a").await? else {
            continue;
        };
        let Some(href) = driver.attribute(&link, "href").await? else {
            continue;
        };
        let Some(seller_url) = absolutize(page_url, &href) else {
            continue;
        };
        if site_name(&seller_url).contains(declared) {
            return Ok(Some(seller_url));
        }
    }
    Ok(None)
}

/// Choose among the scanned listings.
///
/// The listing with strictly the most sellers wins and ties keep the
/// earlier one. Listings without a product link or without any seller are
/// never chosen. The owned-domain signal is the last one seen across all
/// listings.
#[must_use]
pub fn select_from(candidates: &[ListingCandidate]) -> SearchSelection {
    let mut max_sellers = 0;
    let mut chosen: Option<&ListingCandidate> = None;
    for candidate in candidates {
        if candidate.product_url.is_some() && candidate.seller_link_count > max_sellers {
            max_sellers = candidate.seller_link_count;
            chosen = Some(candidate);
        }
    }

    SearchSelection {
        product_url: chosen.and_then(|c| c.product_url.clone()),
        title: chosen.map(|c| c.title.clone()),
        owned_domain_match_url: candidates
            .iter()
            .rev()
            .find_map(|c| c.owned_domain_match_url.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(index: usize, sellers: usize) -> ListingCandidate {
        ListingCandidate {
            product_url: Some(format!("https://shop.example/products/{index}")),
            title: format!("item {index}"),
            seller_link_count: sellers,
            owned_domain_match_url: None,
        }
    }

    #[test]
    fn ties_keep_first_seen() {
        let candidates: Vec<_> = [3, 5, 5, 2]
            .into_iter()
            .enumerate()
            .map(|(i, n)| listing(i, n))
            .collect();
        let selection = select_from(&candidates);
        assert_eq!(
            selection.product_url.as_deref(),
            Some("https://shop.example/products/1")
        );
    }

    #[test]
    fn listings_without_product_link_are_skipped() {
        let mut unreadable = listing(0, 9);
        unreadable.product_url = None;
        let selection = select_from(&[unreadable, listing(1, 2)]);
        assert_eq!(
            selection.product_url.as_deref(),
            Some("https://shop.example/products/1")
        );
    }

    #[test]
    fn sellerless_listings_are_never_chosen() {
        let selection = select_from(&[listing(0, 0)]);
        assert!(selection.is_empty());
    }

    #[test]
    fn owned_signal_is_independent_of_choice() {
        let mut small = listing(0, 1);
        small.owned_domain_match_url = Some("https://acme.com".into());
        let selection = select_from(&[small, listing(1, 4)]);
        assert_eq!(
            selection.product_url.as_deref(),
            Some("https://shop.example/products/1")
        );
        assert_eq!(
            selection.owned_domain_match_url.as_deref(),
            Some("https://acme.com")
        );
    }

    #[test]
    fn later_owned_signal_replaces_earlier() {
        let mut first = listing(0, 1);
        first.owned_domain_match_url = Some("https://acme.com/a".into());
        let mut second = listing(1, 1);
        second.owned_domain_match_url = Some("https://acme.com/b".into());
        let selection = select_from(&[first, second]);
        assert_eq!(
            selection.owned_domain_match_url.as_deref(),
            Some("https://acme.com/b")
        );
    }

    #[test]
    fn nothing_found_is_empty() {
        assert!(select_from(&[]).is_empty());
    }
}
