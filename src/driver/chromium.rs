//! Chrome-backed driver
//!
//! Owns one browser process, its CDP handler task and one page. Every
//! navigation is bounded by the configured page-load timeout so a stalled
//! site cannot hang the batch.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::PageDriver;
use super::wait::with_page_timeout;
use crate::browser_profile::BrowserProfile;
use crate::browser_setup::launch_browser;
use crate::config::FinderConfig;
use crate::error::{FinderError, FinderResult};

const WEBDRIVER_MASK_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// Wrapper for Browser and its event handler task
///
/// Handler MUST be aborted once the browser is gone or it runs forever.
/// Dropping the wrapper aborts it; the profile removes itself on drop.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    profile: BrowserProfile,
}

impl BrowserWrapper {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, profile: BrowserProfile) -> Self {
        Self {
            browser,
            handler,
            profile,
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the browser and wait for the process to exit.
    ///
    /// Failures are logged; the wrapper is consumed either way so the
    /// handler and profile are released.
    async fn shutdown(mut self) {
        info!("Shutting down browser session");

        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }

        // Must complete before the profile is removed, Chrome holds file locks
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }

        debug!(
            "Releasing profile {} (temporary={})",
            self.profile.path().display(),
            self.profile.is_temporary()
        );
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        trace!("Dropping BrowserWrapper - aborting handler task");
        self.handler.abort();
    }
}

/// [`PageDriver`] over a real Chrome session
pub struct ChromiumDriver {
    wrapper: Option<BrowserWrapper>,
    page: Page,
    navigation_timeout: Duration,
}

impl ChromiumDriver {
    /// Launch Chrome and open the single page used for the whole run.
    ///
    /// If the page cannot be created the partially started browser is
    /// released before the error is returned. Every failure here is a
    /// [`FinderError::Browser`].
    pub async fn launch(config: &FinderConfig) -> FinderResult<Self> {
        let (browser, handler, profile) = launch_browser(config).await?;
        let wrapper = BrowserWrapper::new(browser, handler, profile);

        let page = match wrapper.browser().new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                wrapper.shutdown().await;
                return Err(FinderError::Browser(format!("Failed to create page: {e}")));
            }
        };

        if let Err(e) = prepare_page(&page).await {
            warn!("Failed to apply page preparation: {e}");
        }

        info!("Browser session ready");
        Ok(Self {
            wrapper: Some(wrapper),
            page,
            navigation_timeout: config.page_load_timeout(),
        })
    }
}

/// Desktop viewport and the `navigator.webdriver` mask
async fn prepare_page(page: &Page) -> Result<()> {
    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(1920)
            .height(1080)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await?;

    page.execute(
        AddScriptToEvaluateOnNewDocumentParams::builder()
            .source(WEBDRIVER_MASK_SCRIPT)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await?;

    Ok(())
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {url}");
        with_page_timeout(
            async {
                self.page
                    .goto(url)
                    .await
                    .map(|_| ())
                    .map_err(|e| anyhow!("{e}"))
            },
            self.navigation_timeout,
            "Page navigation",
        )
        .await
        .with_context(|| format!("Failed to navigate to {url}"))
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .page
            .url()
            .await
            .context("Failed to read page URL")?
            .unwrap_or_default())
    }

    async fn find_all(&self, scope: Option<&Element>, selector: &str) -> Result<Vec<Element>> {
        let found = match scope {
            Some(element) => element.find_elements(selector).await,
            None => self.page.find_elements(selector).await,
        };
        found.with_context(|| format!("Failed to query '{selector}'"))
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        element
            .attribute(name)
            .await
            .with_context(|| format!("Failed to read attribute '{name}'"))
    }

    async fn text(&self, element: &Element) -> Result<Option<String>> {
        element
            .inner_text()
            .await
            .context("Failed to read element text")
    }

    async fn execute_script(&self, script: &str) -> Result<()> {
        self.page
            .evaluate(script)
            .await
            .map(|_| ())
            .context("Failed to execute script")
    }

    async fn quit(&mut self) -> Result<()> {
        if let Some(wrapper) = self.wrapper.take() {
            wrapper.shutdown().await;
        }
        Ok(())
    }
}
