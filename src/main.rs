//! Newsreel main entry point
//!
//! This is the command-line interface for the Newsreel news crawler.

use anyhow::Context;
use clap::Parser;
use newsreel::config::{load_config_with_hash, validate, Config};
use newsreel::crawler::run_crawl;
use std::path::PathBuf;
use std::process::ExitCode;

/// Newsreel: a recurring news crawler
///
/// Polls a listing page every few seconds and publishes each new item,
/// together with the links posted in its discussion, as a folder.
#[derive(Parser, Debug)]
#[command(name = "newsreel")]
#[command(version)]
#[command(about = "A recurring news crawler", long_about = None)]
struct Cli {
    /// Append log lines to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Optional TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listing page to poll [default: https://news.ycombinator.com/]
    #[arg(long)]
    url: Option<String>,

    /// Output root folder [default: news]
    #[arg(long)]
    folder: Option<PathBuf>,

    /// Maximum number of items per cycle [default: 5]
    #[arg(long)]
    news: Option<usize>,

    /// Seconds between cycle starts [default: 30]
    #[arg(long)]
    wait: Option<u64>,

    /// Maximum number of detail pages fetched at once [default: 3]
    #[arg(long)]
    max_detail_fetches: Option<usize>,

    /// Number of cycles to run [default: run until interrupted]
    #[arg(long)]
    cycles: Option<u32>,
}

impl Cli {
    /// Applies command-line values on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.crawler.listing_url = url.clone();
        }
        if let Some(folder) = &self.folder {
            config.output.folder = folder.clone();
        }
        if let Some(news) = self.news {
            config.crawler.max_items = news;
        }
        if let Some(wait) = self.wait {
            config.crawler.wait_secs = wait;
        }
        if let Some(max) = self.max_detail_fetches {
            config.crawler.max_concurrent_detail_fetches = max;
        }
        if let Some(cycles) = self.cycles {
            config.crawler.cycles = Some(cycles);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = newsreel::logging::init(cli.log.as_deref(), cli.debug) {
        eprintln!("Failed to open log file: {}", e);
        return ExitCode::FAILURE;
    }

    tokio::select! {
        result = run(&cli) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("Unexpected error: {:#}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Stop");
            ExitCode::SUCCESS
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("invalid command-line options")?;

    tracing::info!(
        "Polling {} every {}s, up to {} items per cycle",
        config.crawler.listing_url,
        config.crawler.wait_secs,
        config.crawler.max_items
    );

    run_crawl(config).await.context("crawl stopped")?;
    Ok(())
}
