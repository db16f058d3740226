//! Seller channel discovery pipeline
//!
//! Candidate Selector → Link Extractor → Redirect Resolver → Channel
//! Classifier, driven per seller by the orchestrator over any
//! [`PageDriver`].

pub mod classifier;
pub mod extractor;
pub mod orchestrator;
pub mod progress;
pub mod resolver;
pub mod selector;
pub mod types;

pub use classifier::ChannelClassifier;
pub use extractor::extract_seller_links;
pub use orchestrator::{BatchReport, SellerPipeline};
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};
pub use resolver::RedirectResolver;
pub use selector::{find_candidate, select_from};
pub use types::{
    ChannelCategory, ClassificationResult, ListingCandidate, ResolvedLink, SearchSelection,
    SellerLink, SellerOutcome, SellerRecord,
};

use anyhow::Result;

use crate::config::FinderConfig;
use crate::driver::PageDriver;
use crate::driver::retry::retry_with_backoff;

/// Navigate with the configured retry budget and backoff
pub(crate) async fn navigate_with_retry<D: PageDriver>(
    driver: &D,
    config: &FinderConfig,
    url: &str,
) -> Result<()> {
    retry_with_backoff(
        "Page navigation",
        config.max_retries(),
        config.retry_base_delay(),
        || driver.navigate(url),
    )
    .await
}
