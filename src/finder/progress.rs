//! Progress reporting for discovery batches
//!
//! Defines the `ProgressReporter` trait for per-seller lifecycle events,
//! a no-op implementation and a tracing-backed one for the CLI.

use tracing::{info, warn};

use super::types::{SellerOutcome, SellerRecord};

/// Trait for reporting batch progress at key lifecycle events
///
/// `index` is 1-based.
pub trait ProgressReporter: Send + Sync {
    /// Report that a batch of `total` sellers is starting
    fn report_batch_started(&self, total: usize);

    /// Report that analysis of a seller has started
    fn report_seller_started(&self, index: usize, total: usize, record: &SellerRecord);

    /// Report that a seller was analyzed
    fn report_seller_finished(&self, index: usize, total: usize, outcome: &SellerOutcome);

    /// Report that a seller's analysis failed; an empty outcome is kept
    fn report_seller_failed(&self, index: usize, total: usize, record: &SellerRecord, error: &str);

    /// Report that the batch is done
    fn report_batch_completed(&self, analyzed: usize, total: usize);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_batch_started(&self, _total: usize) {}

    #[inline(always)]
    fn report_seller_started(&self, _index: usize, _total: usize, _record: &SellerRecord) {}

    #[inline(always)]
    fn report_seller_finished(&self, _index: usize, _total: usize, _outcome: &SellerOutcome) {}

    #[inline(always)]
    fn report_seller_failed(
        &self,
        _index: usize,
        _total: usize,
        _record: &SellerRecord,
        _error: &str,
    ) {
    }

    #[inline(always)]
    fn report_batch_completed(&self, _analyzed: usize, _total: usize) {}
}

/// Progress reporter that logs `[i/n]` lines through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report_batch_started(&self, total: usize) {
        info!("Analyzing {total} sellers");
    }

    fn report_seller_started(&self, index: usize, total: usize, record: &SellerRecord) {
        info!(
            "[{index}/{total}] {} (id: {}, ranking: {})",
            record.display_name, record.id, record.rank
        );
    }

    fn report_seller_finished(&self, index: usize, total: usize, outcome: &SellerOutcome) {
        info!(
            "[{index}/{total}] done: {} (smart_store: {}, own_mall: {}, fashion_mall: {}, zigzag_mall: {})",
            outcome.display_name,
            or_dash(&outcome.native_storefront_url),
            or_dash(&outcome.owned_site_url),
            or_dash(&outcome.fashion_channel_url),
            or_dash(&outcome.alternate_marketplace_url),
        );
    }

    fn report_seller_failed(&self, index: usize, total: usize, record: &SellerRecord, error: &str) {
        warn!("[{index}/{total}] failed: {}: {error}", record.display_name);
    }

    fn report_batch_completed(&self, analyzed: usize, total: usize) {
        info!("analyzed {analyzed}/{total} sellers");
    }
}

fn or_dash(url: &str) -> &str {
    if url.is_empty() { "-" } else { url }
}
