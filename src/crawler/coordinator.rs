//! Crawler coordinator - run setup and hand-off to the cycle scheduler
//!
//! This module prepares everything a run needs before the first cycle:
//! - Creating the output root
//! - Removing staging folders left by an earlier, killed process
//! - Building the HTTP client
//! - Creating the cycle scheduler

use crate::config::Config;
use crate::crawler::fetcher::HttpFetcher;
use crate::crawler::publisher::sweep_stale_staging;
use crate::crawler::scheduler::CycleScheduler;
use crate::CrawlError;

/// Main crawler coordinator structure
pub struct Coordinator {
    scheduler: CycleScheduler<HttpFetcher>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Output root is ready and the client is built
    /// * `Err(CrawlError)` - Failed to initialize
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let output_root = config.output.folder.clone();
        std::fs::create_dir_all(&output_root).map_err(|source| CrawlError::Io {
            path: output_root.clone(),
            source,
        })?;

        let swept = sweep_stale_staging(&output_root).map_err(|source| CrawlError::Io {
            path: output_root.clone(),
            source,
        })?;
        if swept > 0 {
            tracing::info!("Cleaned up {} folders left by an earlier run", swept);
        }

        let fetcher = HttpFetcher::from_config(&config.http)?;
        let scheduler = CycleScheduler::new(fetcher, config.crawler, output_root);

        Ok(Self { scheduler })
    }

    /// Runs crawl cycles until the cycle limit or a listing failure
    pub async fn run(&mut self) -> Result<(), CrawlError> {
        tracing::info!(
            "Publishing items to {}",
            self.scheduler.output_root().display()
        );
        self.scheduler.run().await
    }

    /// The scheduler driving the cycles
    pub fn scheduler(&self) -> &CycleScheduler<HttpFetcher> {
        &self.scheduler
    }
}

/// Runs a complete crawl with the given configuration
pub async fn run_crawl(config: Config) -> Result<(), CrawlError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
