//! Chrome discovery and launch
//!
//! Finds a local Chrome/Chromium (or downloads a managed one), then launches
//! it with a desktop fingerprint and a tracked CDP handler task.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use chromiumoxide::handler::Handler;
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::browser_profile::{BrowserProfile, create_unique_profile};
use crate::config::FinderConfig;
use crate::utils::constants::CHROME_USER_AGENT;

/// Environment variable naming the Chrome binary to use
pub const CHROMIUM_PATH_ENV: &str = "CHROMIUM_PATH";

/// Flags that keep the session quiet and look like a regular desktop browser
const LAUNCH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-notifications",
    "--disable-popup-blocking",
    "--disable-extensions",
    "--disable-gpu",
    "--no-first-run",
    "--no-default-browser-check",
    "--no-sandbox",
    "--mute-audio",
    "--password-store=basic",
    "--use-mock-keychain",
    "--lang=ko-KR",
];

const CDP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn install_locations() -> Vec<PathBuf> {
    let fixed: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
    };
    fixed.iter().map(PathBuf::from).collect()
}

/// Ask the shell for a Chrome binary on PATH (unix only)
fn search_path() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        return None;
    }
    ["google-chrome", "chromium", "chromium-browser"]
        .into_iter()
        .find_map(|name| {
            let output = Command::new("which").arg(name).output().ok()?;
            if !output.status.success() {
                return None;
            }
            let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
            (!found.is_empty()).then(|| PathBuf::from(found))
        })
}

/// Locate a Chrome/Chromium binary: `CHROMIUM_PATH`, then well-known
/// install locations, then `PATH`.
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(configured) = std::env::var(CHROMIUM_PATH_ENV) {
        let configured = PathBuf::from(configured);
        if configured.exists() {
            info!("Using {CHROMIUM_PATH_ENV}: {}", configured.display());
            return Ok(configured);
        }
        warn!(
            "{CHROMIUM_PATH_ENV} is set but {} does not exist",
            configured.display()
        );
    }

    if let Some(installed) = install_locations().into_iter().find(|p| p.exists()) {
        info!("Using installed browser: {}", installed.display());
        return Ok(installed);
    }

    if let Some(on_path) = search_path() {
        info!("Using browser from PATH: {}", on_path.display());
        return Ok(on_path);
    }

    Err(anyhow!("No Chrome/Chromium executable found"))
}

/// Download a managed Chromium into the user cache directory.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("storefinder")
        .join("chromium");
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create {}", cache_dir.display()))?;

    info!("Fetching managed Chromium into {}", cache_dir.display());
    let options = BrowserFetcherOptions::builder()
        .with_path(&cache_dir)
        .build()
        .context("Invalid browser fetcher options")?;
    let installed = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Chromium download failed")?;

    debug!("Managed Chromium at {}", installed.folder_path.display());
    Ok(installed.executable_path)
}

/// Drive the CDP event stream until the browser goes away.
fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            let Err(e) = event else { continue };
            let message = e.to_string();
            // Chrome emits CDP messages chromiumoxide has no type for
            if message.contains("data did not match any variant of untagged enum Message")
                || message.contains("Failed to deserialize WS response")
            {
                trace!("Ignoring undecodable CDP message: {message}");
            } else {
                error!("CDP handler error: {e:?}");
            }
        }
        debug!("CDP handler finished");
    })
}

/// Launch Chrome for a discovery session.
///
/// Returns the browser, its CDP handler task and the profile directory. The
/// handler MUST be aborted once the browser is closed; a temporary profile
/// removes itself on drop.
pub async fn launch_browser(
    config: &FinderConfig,
) -> Result<(Browser, JoinHandle<()>, BrowserProfile)> {
    let executable = match find_browser_executable().await {
        Ok(path) => path,
        Err(e) => {
            warn!("{e}; downloading a managed Chromium");
            download_managed_browser().await?
        }
    };

    let profile = match config.chrome_data_dir() {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create profile dir {}", dir.display()))?;
            BrowserProfile::existing(dir.clone())
        }
        None => create_unique_profile()?,
    };

    let mut builder = BrowserConfigBuilder::default()
        .chrome_executable(executable)
        .user_data_dir(profile.path())
        .request_timeout(CDP_REQUEST_TIMEOUT)
        .window_size(1920, 1080)
        .arg(format!("--user-agent={CHROME_USER_AGENT}"));
    for arg in LAUNCH_ARGS {
        builder = builder.arg(*arg);
    }
    builder = if config.headless() {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };
    let browser_config = builder
        .build()
        .map_err(|e| anyhow!("Invalid browser configuration: {e}"))?;

    info!("Launching browser (headless={})", config.headless());
    let (browser, handler) = Browser::launch(browser_config)
        .await
        .context("Browser launch failed")?;

    Ok((browser, spawn_handler(handler), profile))
}
