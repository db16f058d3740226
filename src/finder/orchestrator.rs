//! Pipeline Orchestrator
//!
//! Runs search, extraction, resolution and classification for each seller
//! on one shared driver and folds the results into a `SellerOutcome`.
//!
//! - A seller that fails (error or panic) gets an empty outcome and the batch
//!   continues.
//! - The driver is owned by the batch and quit exactly once at the end.
//! - The owned-domain signal from the listing scan is folded in before any
//!   classified link, so it takes the owned-site slot when both exist.

use std::panic::AssertUnwindSafe;

use anyhow::Result;
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use super::classifier::ChannelClassifier;
use super::extractor::extract_seller_links;
use super::progress::ProgressReporter;
use super::resolver::RedirectResolver;
use super::selector::find_candidate;
use super::types::{ChannelCategory, ClassificationResult, ResolvedLink, SellerOutcome, SellerRecord};
use crate::config::FinderConfig;
use crate::driver::PageDriver;

/// Result of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One outcome per input record, in input order
    pub outcomes: Vec<SellerOutcome>,
    /// Sellers whose pipeline completed without error
    pub analyzed: usize,
}

impl BatchReport {
    /// Sellers isolated after a failure
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.analyzed
    }
}

/// Per-run pipeline state built once from the configuration
#[derive(Debug, Clone)]
pub struct SellerPipeline {
    config: FinderConfig,
    classifier: ChannelClassifier,
    resolver: RedirectResolver,
}

impl SellerPipeline {
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let classifier = ChannelClassifier::new(&config);
        let resolver = RedirectResolver::new(&config);
        Self {
            config,
            classifier,
            resolver,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Discover the channels of one seller.
    ///
    /// Errors come only from the search step; extraction and redirect
    /// failures have already been absorbed.
    pub async fn analyze_seller<D: PageDriver>(
        &self,
        driver: &D,
        record: &SellerRecord,
    ) -> Result<SellerOutcome> {
        let selection = find_candidate(
            driver,
            &self.config,
            &record.display_name,
            &record.declared_url,
        )
        .await?;

        if selection.is_empty() {
            info!("No candidate listing for {}", record.display_name);
            return Ok(SellerOutcome::empty(record));
        }

        let mut resolved = Vec::new();
        if let Some(owned) = selection.owned_domain_match_url {
            resolved.push(ResolvedLink::owned_signal(owned));
        }

        if let Some(product_url) = &selection.product_url {
            let links = extract_seller_links(driver, &self.config, product_url).await;
            resolved.extend(self.resolver.resolve_all(driver, &links).await);
        }

        Ok(self.fold_outcome(record, &resolved))
    }

    /// Classify resolved links and keep the first hit per channel.
    #[must_use]
    pub fn fold_outcome(&self, record: &SellerRecord, resolved: &[ResolvedLink]) -> SellerOutcome {
        let mut outcome = SellerOutcome::empty(record);
        for link in resolved {
            let result = if link.is_owned_domain {
                ClassificationResult {
                    category: ChannelCategory::OwnedSite,
                    url: link.final_url.clone(),
                }
            } else {
                self.classifier.classify(&link.final_url, &record.declared_url)
            };

            if outcome.record_first_hit(&result) {
                info!("{} found: {}", result.category, result.url);
            } else if result.category != ChannelCategory::Unclassified {
                debug!("{} already set, ignoring {}", result.category, result.url);
            }
        }
        outcome
    }

    /// Analyze every record on one driver, then quit it.
    ///
    /// Produces exactly one outcome per record even when sellers fail.
    pub async fn run_batch<D, P>(
        &self,
        mut driver: D,
        records: &[SellerRecord],
        progress: &P,
    ) -> BatchReport
    where
        D: PageDriver,
        P: ProgressReporter,
    {
        let total = records.len();
        progress.report_batch_started(total);

        let mut report = BatchReport {
            outcomes: Vec::with_capacity(total),
            analyzed: 0,
        };

        for (idx, record) in records.iter().enumerate() {
            let index = idx + 1;
            progress.report_seller_started(index, total, record);

            let attempt = AssertUnwindSafe(self.analyze_seller(&driver, record))
                .catch_unwind()
                .await;

            match attempt {
                Ok(Ok(outcome)) => {
                    progress.report_seller_finished(index, total, &outcome);
                    report.analyzed += 1;
                    report.outcomes.push(outcome);
                }
                Ok(Err(e)) => {
                    let message = format!("{e:#}");
                    error!("Seller {} failed: {message}", record.display_name);
                    progress.report_seller_failed(index, total, record, &message);
                    report.outcomes.push(SellerOutcome::empty(record));
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!("Seller {} panicked: {message}", record.display_name);
                    progress.report_seller_failed(index, total, record, &message);
                    report.outcomes.push(SellerOutcome::empty(record));
                }
            }
        }

        if let Err(e) = driver.quit().await {
            warn!("Failed to release browser session: {e:#}");
        } else {
            info!("Browser session released");
        }

        progress.report_batch_completed(report.analyzed, total);
        report
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
