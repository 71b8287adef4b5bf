//! The `scrape` command: one invocation against one marketplace.

use pricescan_browser::ChromiumLauncher;
use pricescan_core::{AppConfig, Platform};
use pricescan_scraper::{BlockDetector, ScrapeSettings, Scraper};

use crate::signatures::block_signatures;

/// Runs one scrape and writes the records to stdout as pretty JSON.
///
/// Page and card failures are logged by the engine and never reach here;
/// only session-level failures make the command fail.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    platform: Platform,
    query: &str,
    pages: u32,
) -> anyhow::Result<()> {
    let detector = BlockDetector::new(block_signatures(config.block_signatures_path.as_deref())?);
    let launcher = ChromiumLauncher::from_config(config);
    let scraper = Scraper::new(launcher, ScrapeSettings::from_config(config), detector);

    let records = scraper.scrape(platform, query, pages).await?;
    tracing::info!(%platform, query, pages, records = records.len(), "scrape command complete");

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
