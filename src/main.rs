// Seller channel discovery CLI
//
// Reads a seller table, searches the marketplace for each seller on one
// browser session and writes the channels found to a result table.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use kodegen_tools_storefinder::{
    ChromiumDriver, LogProgress, SellerPipeline, SnapshotDriver, load_config, read_sellers,
    run_discovery,
};

#[derive(Debug, Parser)]
#[command(
    name = "kodegen-storefinder",
    version,
    about = "Find the sales channels of marketplace sellers"
)]
struct Cli {
    /// Seller table (CSV with shop_id, name, ranking, url)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Result table
    #[arg(short, long, value_name = "FILE", default_value = "result.csv")]
    output: PathBuf,

    /// JSON file overriding hosts, selectors and timeouts
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long, default_value_t = false)]
    headed: bool,

    /// Replay saved pages from a snapshot manifest instead of a browser
    #[arg(long, value_name = "MANIFEST")]
    snapshot: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level))
                .add_directive("chromiumoxide::handler=off".parse()?)
                .add_directive("chromiumoxide::conn=off".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(cli.config.as_deref(), !cli.headed)?;

    // Input problems abort before a browser is started
    let records = read_sellers(&cli.input)?;
    if records.is_empty() {
        info!("No sellers in {}", cli.input.display());
        return Ok(());
    }

    let pipeline = SellerPipeline::new(config);
    let report = match &cli.snapshot {
        Some(manifest) => {
            let driver = SnapshotDriver::from_manifest(manifest)?;
            run_discovery(&pipeline, driver, &records, &cli.output, &LogProgress).await?
        }
        None => {
            let driver = ChromiumDriver::launch(pipeline.config())
                .await
                .context("Failed to start browser session")?;
            run_discovery(&pipeline, driver, &records, &cli.output, &LogProgress).await?
        }
    };

    if report.failed() > 0 {
        warn!("{} sellers failed and were written with empty channels", report.failed());
    }
    Ok(())
}
