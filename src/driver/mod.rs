//! Browser automation driver interface
//!
//! The pipeline only talks to a page through [`PageDriver`]. Two
//! implementations exist:
//! - [`ChromiumDriver`]: a real Chrome session over CDP (chromiumoxide)
//! - [`SnapshotDriver`]: saved HTML pages and a redirect table, for offline
//!   runs and tests
//!
//! One driver instance is one session. All calls serialize on it; the
//! orchestrator owns it for the whole batch and calls [`PageDriver::quit`]
//! exactly once.

mod chromium;
mod snapshot;

pub mod retry;
pub mod wait;

pub use chromium::{BrowserWrapper, ChromiumDriver};
pub use snapshot::{SnapshotDriver, SnapshotElement, SnapshotLog};

use anyhow::Result;
use async_trait::async_trait;

/// Operations the pipeline needs from a browser session.
///
/// `scope` restricts a lookup to descendants of an element; `None` searches
/// the whole page.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Handle to an element of the currently loaded page
    type Element: Send + Sync;

    /// Load `url`, replacing the current page
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Address of the page presently loaded (empty if none)
    async fn current_url(&self) -> Result<String>;

    /// All elements matching `selector`, in document order
    async fn find_all(
        &self,
        scope: Option<&Self::Element>,
        selector: &str,
    ) -> Result<Vec<Self::Element>>;

    /// First element matching `selector`, if any
    async fn find(
        &self,
        scope: Option<&Self::Element>,
        selector: &str,
    ) -> Result<Option<Self::Element>> {
        Ok(self.find_all(scope, selector).await?.into_iter().next())
    }

    /// Raw attribute value as written in the markup
    async fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    /// Rendered text of an element
    async fn text(&self, element: &Self::Element) -> Result<Option<String>>;

    /// Run a script in the page; the result is discarded
    async fn execute_script(&self, script: &str) -> Result<()>;

    /// Release the session
    async fn quit(&mut self) -> Result<()>;
}
