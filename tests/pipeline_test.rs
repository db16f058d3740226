//! End-to-end pipeline runs over snapshot pages

use kodegen_tools_storefinder::driver::{PageDriver, SnapshotDriver};
use kodegen_tools_storefinder::finder::{
    NoOpProgress, RedirectResolver, SellerPipeline, extract_seller_links, find_candidate,
};

mod common;
use common::{
    FaultyDriver, Listing, product_page, search_page, search_url, seller, test_config,
};

const PRODUCT_URL: &str = "https://search.test/catalog/1";

#[tokio::test]
async fn acme_channels_are_discovered() {
    let driver = SnapshotDriver::new()
        .with_page(
            search_url("ACME"),
            search_page(&[Listing::new("ACME Hoodie", "/catalog/1", 4)]),
        )
        .with_page(
            PRODUCT_URL,
            product_page(&[
                "https://smartstore.example/acme",
                "https://acme.com/p/1",
                "https://cr.shopping.naver.com/adcr?id=9",
                "https://elsewhere.example/item",
            ]),
        )
        .with_redirect(
            "https://cr.shopping.naver.com/adcr?id=9",
            "https://partner.example/landing",
        );
    let log = driver.log();

    let pipeline = SellerPipeline::new(test_config());
    let report = pipeline
        .run_batch(driver, &[seller(1, "ACME", "acme.com")], &NoOpProgress)
        .await;

    assert_eq!(report.analyzed, 1);
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.id, 1);
    assert_eq!(outcome.native_storefront_url, "https://smartstore.example/acme");
    assert_eq!(outcome.owned_site_url, "https://acme.com/p/1");
    assert_eq!(outcome.fashion_channel_url, "");
    assert_eq!(outcome.alternate_marketplace_url, "");

    let navigations = log.navigations();
    assert_eq!(
        navigations,
        vec![
            search_url("ACME"),
            PRODUCT_URL.to_string(),
            "https://cr.shopping.naver.com/adcr?id=9".to_string(),
        ]
    );
    assert_eq!(log.quits(), 1);
}

#[tokio::test]
async fn most_listed_item_wins_with_stable_ties() {
    let listings: Vec<Listing> = [3, 5, 5, 2]
        .into_iter()
        .enumerate()
        .map(|(i, count)| Listing::new(&format!("item {i}"), &format!("/catalog/{i}"), count))
        .collect();
    let driver = SnapshotDriver::new().with_page(search_url("Tie"), search_page(&listings));
    driver.navigate("about:blank").await.unwrap();

    let selection = find_candidate(&driver, &test_config(), "Tie", "")
        .await
        .unwrap();
    assert_eq!(
        selection.product_url.as_deref(),
        Some("https://search.test/catalog/1")
    );
    assert_eq!(selection.title.as_deref(), Some("item 1"));
    assert_eq!(driver.log().scripts().len(), 1);
}

#[tokio::test]
async fn owned_domain_in_listing_takes_owned_slot() {
    let driver = SnapshotDriver::new()
        .with_page(
            search_url("ACME"),
            search_page(&[
                Listing::new("ACME Tee", "/catalog/1", 2),
                Listing::new("ACME Cap", "/catalog/2", 1).with_seller("https://www.acme.com/"),
            ]),
        )
        .with_page(PRODUCT_URL, product_page(&["https://acme.com/p/1"]));

    let pipeline = SellerPipeline::new(test_config());
    let report = pipeline
        .run_batch(driver, &[seller(1, "ACME", "acme.com")], &NoOpProgress)
        .await;

    // Both items have two sellers; the first one is chosen, the owned
    // signal comes from the second
    assert_eq!(report.outcomes[0].owned_site_url, "https://www.acme.com/");
}

#[tokio::test]
async fn first_matching_seller_in_an_item_is_the_owned_signal() {
    let driver = SnapshotDriver::new().with_page(
        search_url("ACME"),
        search_page(&[Listing::new("ACME Tee", "/catalog/1", 1)
            .with_seller("https://acme.com/first")
            .with_seller("https://shop.acme.com/second")]),
    );

    let selection = find_candidate(&driver, &test_config(), "ACME", "acme.com")
        .await
        .unwrap();
    assert_eq!(
        selection.owned_domain_match_url.as_deref(),
        Some("https://acme.com/first")
    );
}

#[tokio::test]
async fn relative_mall_links_match_on_the_resolved_host() {
    // Resolves to https://search.test/mall/acme, which is not acme's site
    let driver = SnapshotDriver::new().with_page(
        search_url("ACME"),
        search_page(&[Listing::new("ACME Tee", "/catalog/1", 1).with_seller("/mall/acme")]),
    );

    let selection = find_candidate(&driver, &test_config(), "ACME", "acme.com")
        .await
        .unwrap();
    assert_eq!(selection.owned_domain_match_url, None);
    assert_eq!(
        selection.product_url.as_deref(),
        Some("https://search.test/catalog/1")
    );
}

#[tokio::test]
async fn owned_signal_survives_a_failed_seller_count() {
    let snapshot = SnapshotDriver::new().with_page(
        search_url("ACME"),
        search_page(&[Listing::new("ACME Tee", "/catalog/1", 2).with_seller("https://acme.com/")]),
    );
    let config = test_config();
    let driver = FaultyDriver::new(snapshot).breaking_selector(config.selectors().mall_entry.clone());

    let selection = find_candidate(&driver, &config, "ACME", "acme.com")
        .await
        .unwrap();
    assert_eq!(
        selection.owned_domain_match_url.as_deref(),
        Some("https://acme.com/")
    );
    // Without a count the item cannot be selected
    assert_eq!(selection.product_url, None);
}

#[tokio::test]
async fn owned_signal_alone_produces_outcome() {
    let driver = SnapshotDriver::new().with_page(
        search_url("ACME"),
        search_page(&[Listing::new("ACME Tee", "/catalog/1", 0)
            .with_seller("https://acme.com/")
            .without_product_link()]),
    );

    let pipeline = SellerPipeline::new(test_config());
    let report = pipeline
        .run_batch(driver, &[seller(1, "ACME", "acme.com")], &NoOpProgress)
        .await;

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.owned_site_url, "https://acme.com/");
    assert!(outcome.native_storefront_url.is_empty());
}

#[tokio::test]
async fn failing_seller_does_not_stop_the_batch() {
    let page = search_page(&[Listing::new("Item", "/catalog/1", 1)]);
    let driver = SnapshotDriver::new()
        .with_page(search_url("One"), page.clone())
        .with_page(search_url("Three"), page)
        .with_page(PRODUCT_URL, product_page(&["https://smartstore.example/shop"]))
        .failing_on(search_url("Two"));
    let log = driver.log();

    let sellers = [
        seller(1, "One", ""),
        seller(2, "Two", ""),
        seller(3, "Three", ""),
    ];
    let report = SellerPipeline::new(test_config())
        .run_batch(driver, &sellers, &NoOpProgress)
        .await;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.analyzed, 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(
        report.outcomes[0].native_storefront_url,
        "https://smartstore.example/shop"
    );
    assert_eq!(report.outcomes[1].id, 2);
    assert!(!report.outcomes[1].has_any_channel());
    assert_eq!(
        report.outcomes[2].native_storefront_url,
        "https://smartstore.example/shop"
    );
    assert_eq!(log.quits(), 1);
}

#[tokio::test]
async fn panicking_seller_does_not_stop_the_batch() {
    let page = search_page(&[Listing::new("Item", "/catalog/1", 1)]);
    let snapshot = SnapshotDriver::new()
        .with_page(search_url("One"), page.clone())
        .with_page(search_url("Three"), page)
        .with_page(PRODUCT_URL, product_page(&["https://smartstore.example/shop"]));
    let log = snapshot.log();
    let driver = FaultyDriver::new(snapshot).panicking_on(search_url("Two"));

    let sellers = [
        seller(1, "One", ""),
        seller(2, "Two", ""),
        seller(3, "Three", ""),
    ];
    let report = SellerPipeline::new(test_config())
        .run_batch(driver, &sellers, &NoOpProgress)
        .await;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.analyzed, 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.outcomes[1].id, 2);
    assert!(!report.outcomes[1].has_any_channel());
    assert_eq!(
        report.outcomes[2].native_storefront_url,
        "https://smartstore.example/shop"
    );
    assert_eq!(log.quits(), 1);
}

#[tokio::test]
async fn first_native_storefront_hit_is_kept() {
    let driver = SnapshotDriver::new()
        .with_page(
            search_url("Dup"),
            search_page(&[Listing::new("Item", "/catalog/1", 2)]),
        )
        .with_page(
            PRODUCT_URL,
            product_page(&[
                "https://smartstore.example/first",
                "https://smartstore.example/second",
            ]),
        );

    let report = SellerPipeline::new(test_config())
        .run_batch(driver, &[seller(5, "Dup", "")], &NoOpProgress)
        .await;
    assert_eq!(
        report.outcomes[0].native_storefront_url,
        "https://smartstore.example/first"
    );
}

#[tokio::test]
async fn alternate_marketplace_beats_fashion_keyword() {
    let driver = SnapshotDriver::new()
        .with_page(
            search_url("Zig"),
            search_page(&[Listing::new("Item", "/catalog/1", 1)]),
        )
        .with_page(
            PRODUCT_URL,
            product_page(&["https://zigzag.kr/fashion/store/77"]),
        );

    let report = SellerPipeline::new(test_config())
        .run_batch(driver, &[seller(1, "Zig", "")], &NoOpProgress)
        .await;
    let outcome = &report.outcomes[0];
    assert_eq!(
        outcome.alternate_marketplace_url,
        "https://zigzag.kr/fashion/store/77"
    );
    assert!(outcome.fashion_channel_url.is_empty());
}

#[tokio::test]
async fn non_indirection_links_pass_through_without_navigation() {
    let driver = SnapshotDriver::new();
    let resolver = RedirectResolver::new(&test_config());

    let resolved = resolver
        .resolve(&driver, "https://brand.example/shop")
        .await
        .unwrap();
    assert_eq!(resolved.final_url, "https://brand.example/shop");
    assert_eq!(resolved.source_link, resolved.final_url);
    assert!(!resolved.is_owned_domain);
    assert!(driver.log().navigations().is_empty());
}

#[tokio::test]
async fn indirection_link_that_never_moves_is_dropped() {
    let driver = SnapshotDriver::new()
        .with_redirect("https://cr.shopping.naver.com/adcr?id=2", "https://dest.example/");
    let resolver = RedirectResolver::new(&test_config());

    let links = vec![
        "https://cr.shopping.naver.com/adcr?id=1".to_string(),
        "https://cr.shopping.naver.com/adcr?id=2".to_string(),
    ];
    let resolved = resolver.resolve_all(&driver, &links).await;
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].source_link, links[1]);
    assert_eq!(resolved[0].final_url, "https://dest.example/");
}

#[tokio::test]
async fn failed_indirection_link_is_skipped_without_retry() {
    let first = "https://cr.shopping.naver.com/adcr?id=1";
    let second = "https://cr.shopping.naver.com/adcr?id=2";
    let driver = SnapshotDriver::new()
        .failing_on(first)
        .with_redirect(second, "https://dest.example/");
    let resolver = RedirectResolver::new(&test_config());

    let links = vec![first.to_string(), second.to_string()];
    let resolved = resolver.resolve_all(&driver, &links).await;

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].source_link, second);
    assert_eq!(resolved[0].final_url, "https://dest.example/");
    assert_eq!(driver.log().navigations(), links);
}

#[tokio::test]
async fn declared_name_in_a_path_does_not_take_the_owned_slot() {
    let driver = SnapshotDriver::new()
        .with_page(
            search_url("ACME"),
            search_page(&[Listing::new("ACME Hoodie", "/catalog/1", 1)]),
        )
        .with_page(
            PRODUCT_URL,
            product_page(&[
                "https://partner.example/landing?ref=acme",
                "https://acme.com/p/1",
            ]),
        );

    let report = SellerPipeline::new(test_config())
        .run_batch(driver, &[seller(1, "ACME", "acme.com")], &NoOpProgress)
        .await;
    assert_eq!(report.outcomes[0].owned_site_url, "https://acme.com/p/1");
}

#[tokio::test]
async fn extraction_failure_is_an_empty_list() {
    let driver = SnapshotDriver::new().failing_on(PRODUCT_URL);
    let links = extract_seller_links(&driver, &test_config(), PRODUCT_URL).await;
    assert!(links.is_empty());
}

#[tokio::test]
async fn extraction_keeps_order_and_duplicates() {
    let driver = SnapshotDriver::new().with_page(
        PRODUCT_URL,
        product_page(&["/go/1", "https://b.example/", "/go/1"]),
    );
    let links = extract_seller_links(&driver, &test_config(), PRODUCT_URL).await;
    assert_eq!(
        links,
        vec![
            "https://search.test/go/1",
            "https://b.example/",
            "https://search.test/go/1",
        ]
    );
}

#[tokio::test]
async fn search_without_results_is_empty_outcome() {
    let driver = SnapshotDriver::new()
        .with_page(search_url("Ghost"), "<html><body>No results</body></html>");

    let report = SellerPipeline::new(test_config())
        .run_batch(driver, &[seller(9, "Ghost", "ghost.com")], &NoOpProgress)
        .await;
    assert_eq!(report.analyzed, 1);
    assert!(!report.outcomes[0].has_any_channel());
    assert_eq!(report.outcomes[0].display_name, "Ghost");
}

#[tokio::test]
async fn snapshot_manifest_replays_saved_pages() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("search.html"),
        search_page(&[Listing::new("Item", "/catalog/1", 1)]),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("product.html"),
        product_page(&["https://cr.shopping.naver.com/adcr?id=3"]),
    )
    .unwrap();
    let manifest = serde_json::json!({
        "pages": {
            search_url("Saved"): "search.html",
            PRODUCT_URL: "product.html",
        },
        "redirects": {
            "https://cr.shopping.naver.com/adcr?id=3": "https://smartstore.example/saved",
        },
    });
    let manifest_path = dir.path().join("manifest.json");
    std::fs::write(&manifest_path, manifest.to_string()).unwrap();

    let driver = SnapshotDriver::from_manifest(&manifest_path).unwrap();
    let report = SellerPipeline::new(test_config())
        .run_batch(driver, &[seller(1, "Saved", "")], &NoOpProgress)
        .await;
    assert_eq!(
        report.outcomes[0].native_storefront_url,
        "https://smartstore.example/saved"
    );
}
