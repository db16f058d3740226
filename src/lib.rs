pub mod browser_profile;
pub mod browser_setup;
pub mod config;
pub mod driver;
pub mod error;
pub mod finder;
pub mod table;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{FinderConfig, FinderConfigBuilder, SelectorSet};
pub use driver::{ChromiumDriver, PageDriver, SnapshotDriver, SnapshotElement, SnapshotLog};
pub use error::{FinderError, FinderResult, TableError};
pub use finder::{
    BatchReport, ChannelCategory, ChannelClassifier, ClassificationResult, LogProgress,
    NoOpProgress, ProgressReporter, RedirectResolver, ResolvedLink, SellerOutcome,
    SellerPipeline, SellerRecord,
};
pub use table::{read_sellers, write_outcomes};
pub use utils::{clean_url, normalize_domain};

use std::path::Path;

/// Load the run configuration: defaults, optionally overridden by a JSON
/// file, with the headless flag applied last.
pub fn load_config(path: Option<&Path>, headless: bool) -> FinderResult<FinderConfig> {
    let loaded = match path {
        Some(path) => FinderConfig::from_json_file(path)
            .map_err(|e| FinderError::Config(format!("{e:#}")))?,
        None => FinderConfig::default(),
    };
    loaded
        .into_builder()
        .headless(headless)
        .build()
        .map_err(|e| FinderError::Config(format!("{e:#}")))
}

/// Analyze `records` on `driver` and write the result table to `output`.
///
/// The driver is quit before the table is written.
pub async fn run_discovery<D, P>(
    pipeline: &SellerPipeline,
    driver: D,
    records: &[SellerRecord],
    output: &Path,
    progress: &P,
) -> FinderResult<BatchReport>
where
    D: PageDriver,
    P: ProgressReporter,
{
    let report = pipeline.run_batch(driver, records, progress).await;
    write_outcomes(output, &report.outcomes)?;
    Ok(report)
}
