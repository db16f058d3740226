//! Offline driver over saved HTML pages
//!
//! Serves snapshots keyed by URL, follows a redirect table on navigation and
//! records what the pipeline did, so the whole pipeline can run without a
//! browser. Markup is parsed with `scraper` on every query; element handles
//! are tree node ids, which are stable across parses of the same document.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use super::PageDriver;

/// Redirect chains longer than this are treated as a loop
const MAX_REDIRECT_HOPS: usize = 10;

/// Handle to an element of a snapshot page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotElement {
    page: String,
    node: NodeId,
}

/// What the pipeline asked the driver to do
#[derive(Debug, Default)]
pub struct SnapshotLog {
    navigations: Mutex<Vec<String>>,
    scripts: Mutex<Vec<String>>,
    quits: AtomicUsize,
}

impl SnapshotLog {
    /// URLs passed to `navigate`, in call order
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Scripts passed to `execute_script`, in call order
    #[must_use]
    pub fn scripts(&self) -> Vec<String> {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `quit` calls
    #[must_use]
    pub fn quits(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    current_url: String,
    closed: bool,
}

/// On-disk manifest for [`SnapshotDriver::from_manifest`]
#[derive(Debug, Deserialize)]
struct Manifest {
    /// URL → HTML file, relative to the manifest
    #[serde(default)]
    pages: HashMap<String, String>,
    /// URL → URL it redirects to
    #[serde(default)]
    redirects: HashMap<String, String>,
}

/// [`PageDriver`] over in-memory HTML snapshots
#[derive(Debug, Default)]
pub struct SnapshotDriver {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    failing: HashSet<String>,
    state: Mutex<SessionState>,
    log: Arc<SnapshotLog>,
}

impl SnapshotDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` when `url` is loaded
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Navigating to `from` ends up at `to`
    #[must_use]
    pub fn with_redirect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.redirects.insert(from.into(), to.into());
        self
    }

    /// Navigating to `url` fails with a network error
    #[must_use]
    pub fn failing_on(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    /// Load pages and redirects described by a JSON manifest:
    /// `{"pages": {"<url>": "<file.html>"}, "redirects": {"<url>": "<url>"}}`
    pub fn from_manifest(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot manifest {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid snapshot manifest {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let mut driver = Self::new();
        for (url, file) in manifest.pages {
            let html = std::fs::read_to_string(base.join(&file))
                .with_context(|| format!("Failed to read snapshot page {file}"))?;
            driver.pages.insert(url, html);
        }
        driver.redirects = manifest.redirects;
        Ok(driver)
    }

    /// Shared handle to the call log; stays valid after the driver is moved
    #[must_use]
    pub fn log(&self) -> Arc<SnapshotLog> {
        Arc::clone(&self.log)
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Parse the page currently loaded; elements must belong to it
    fn current_document(&self, element: Option<&SnapshotElement>) -> Result<(String, Html)> {
        let current = {
            let state = self.state();
            if state.closed {
                return Err(anyhow!("browser closed"));
            }
            state.current_url.clone()
        };

        if let Some(element) = element
            && element.page != current
        {
            return Err(anyhow!(
                "stale element reference: element belongs to {} but {} is loaded",
                element.page,
                current
            ));
        }

        let html = self.pages.get(&current).map_or("", String::as_str);
        Ok((current, Html::parse_document(html)))
    }

    fn resolve_redirects(&self, url: &str) -> String {
        let mut target = url.to_string();
        for _ in 0..MAX_REDIRECT_HOPS {
            match self.redirects.get(&target) {
                Some(next) if next != &target => target.clone_from(next),
                _ => break,
            }
        }
        target
    }
}

fn element_ref<'a>(doc: &'a Html, element: &SnapshotElement) -> Result<ElementRef<'a>> {
    doc.tree
        .get(element.node)
        .and_then(ElementRef::wrap)
        .ok_or_else(|| anyhow!("element no longer present in document"))
}

#[async_trait]
impl PageDriver for SnapshotDriver {
    type Element = SnapshotElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.log
            .navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        if self.state().closed {
            return Err(anyhow!("browser closed"));
        }

        if self.failing.contains(url) {
            return Err(anyhow!("net::ERR_CONNECTION_REFUSED while loading {url}"));
        }

        let landed = self.resolve_redirects(url);
        debug!("Snapshot navigation {url} -> {landed}");
        self.state().current_url = landed;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let state = self.state();
        if state.closed {
            return Err(anyhow!("browser closed"));
        }
        Ok(state.current_url.clone())
    }

    async fn find_all(
        &self,
        scope: Option<&SnapshotElement>,
        selector: &str,
    ) -> Result<Vec<SnapshotElement>> {
        let parsed = Selector::parse(selector)
            .map_err(|e| anyhow!("Invalid selector '{selector}': {e}"))?;
        let (page, doc) = self.current_document(scope)?;

        let nodes: Vec<NodeId> = match scope {
            Some(element) => element_ref(&doc, element)?
                .select(&parsed)
                .map(|found| found.id())
                .collect(),
            None => doc.select(&parsed).map(|found| found.id()).collect(),
        };

        Ok(nodes
            .into_iter()
            .map(|node| SnapshotElement {
                page: page.clone(),
                node,
            })
            .collect())
    }

    async fn attribute(&self, element: &SnapshotElement, name: &str) -> Result<Option<String>> {
        let (_, doc) = self.current_document(Some(element))?;
        let found = element_ref(&doc, element)?;
        Ok(found.value().attr(name).map(ToString::to_string))
    }

    async fn text(&self, element: &SnapshotElement) -> Result<Option<String>> {
        let (_, doc) = self.current_document(Some(element))?;
        let found = element_ref(&doc, element)?;
        Ok(Some(found.text().collect::<String>()))
    }

    async fn execute_script(&self, script: &str) -> Result<()> {
        if self.state().closed {
            return Err(anyhow!("browser closed"));
        }
        self.log
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(script.to_string());
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        self.log.quits.fetch_add(1, Ordering::SeqCst);
        self.state().closed = true;
        Ok(())
    }
}
