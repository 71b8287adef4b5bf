mod scrape;
mod signatures;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pricescan_core::Platform;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricescan-cli")]
#[command(about = "Marketplace product listing scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape search result pages and print the records as JSON
    Scrape {
        /// aliexpress, alibaba, temu or madeinchina
        #[arg(long)]
        platform: Platform,

        /// Search terms
        #[arg(long)]
        query: String,

        /// Number of result pages to visit
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Validate a block-signature file and print the normalized lists
    Signatures {
        /// Defaults to PRICESCAN_BLOCK_SIGNATURES_PATH
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = pricescan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scrape {
            platform,
            query,
            pages,
        } => scrape::run_scrape(&config, platform, &query, pages).await,
        Commands::Signatures { path } => {
            signatures::run_signatures(path.or_else(|| config.block_signatures_path.clone()).as_deref())
        }
    }
}
