//! Cycle scheduler
//!
//! This module drives the poll loop:
//! - Fetch and parse the listing page
//! - Drop items that were already published
//! - Publish the remaining items concurrently
//! - Tally and log outcomes in completion order
//! - Sleep the remainder of the cycle interval

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::parse_listing;
use crate::crawler::publisher::publish_item;
use crate::output::CycleStats;
use crate::state::DedupTracker;
use crate::CrawlError;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;

/// Time left to wait before the next cycle starts
///
/// Cycle starts stay `wait` apart as long as the work fits in the interval.
/// Overlong cycles are followed immediately by the next one, never by a
/// shortened later interval.
pub fn compensated_wait(wait: Duration, elapsed: Duration) -> Duration {
    wait.saturating_sub(elapsed)
}

/// Runs crawl cycles against one listing page
///
/// The scheduler owns everything that outlives a cycle: the dedup set and
/// the detail-page gate. Item futures only return results; the scheduler
/// applies them.
pub struct CycleScheduler<F> {
    fetcher: F,
    config: CrawlerConfig,
    output_root: PathBuf,
    dedup: DedupTracker,
    /// Bounds in-flight detail-page fetches across the whole cycle
    gate: Semaphore,
    cycles_run: u64,
}

impl<F: Fetcher> CycleScheduler<F> {
    /// Creates a scheduler with an empty dedup set
    pub fn new(fetcher: F, config: CrawlerConfig, output_root: PathBuf) -> Self {
        Self::with_dedup(fetcher, config, output_root, DedupTracker::new())
    }

    /// Creates a scheduler that starts from an existing dedup set
    pub fn with_dedup(
        fetcher: F,
        config: CrawlerConfig,
        output_root: PathBuf,
        dedup: DedupTracker,
    ) -> Self {
        let gate = Semaphore::new(config.max_concurrent_detail_fetches.max(1));

        Self {
            fetcher,
            config,
            output_root,
            dedup,
            gate,
            cycles_run: 0,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn dedup(&self) -> &DedupTracker {
        &self.dedup
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Number of cycles started so far
    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    /// Runs cycles until the configured limit is reached
    ///
    /// Without a limit this only returns on a listing failure. A failed
    /// listing fetch is not retried: the error ends the run.
    pub async fn run(&mut self) -> Result<(), CrawlError> {
        let wait = self.config.wait();

        loop {
            let started = Instant::now();
            self.run_cycle().await?;

            if self.limit_reached() {
                tracing::info!("Completed {} cycles, stopping", self.cycles_run);
                return Ok(());
            }

            let remaining = compensated_wait(wait, started.elapsed());
            tracing::info!("Waiting {:.1}s before next cycle", remaining.as_secs_f64());
            tokio::time::sleep(remaining).await;
        }
    }

    fn limit_reached(&self) -> bool {
        self.config
            .cycles
            .is_some_and(|limit| self.cycles_run >= u64::from(limit))
    }

    /// Runs one cycle and returns its statistics
    ///
    /// # Returns
    ///
    /// * `Ok(CycleStats)` - The cycle ran; item failures are counted, not returned
    /// * `Err(CrawlError::Listing)` - The listing page could not be fetched
    pub async fn run_cycle(&mut self) -> Result<CycleStats, CrawlError> {
        self.cycles_run += 1;
        let started = Instant::now();
        let mut stats = CycleStats::new(self.cycles_run);

        tracing::info!(
            "Cycle {} started: fetching {}",
            self.cycles_run,
            self.config.listing_url
        );

        let listing = self
            .fetcher
            .fetch_text(&self.config.listing_url)
            .await
            .map_err(CrawlError::Listing)?;

        let base_url = self.config.base_url();
        let candidates = parse_listing(&listing, &base_url, self.config.max_items);
        let discovered = candidates.len();
        let fresh = self.dedup.filter_new(candidates);
        tracing::debug!(
            "Listing yielded {} items, {} not published yet",
            discovered,
            fresh.len()
        );
        stats.attempted = fresh.len();

        let mut in_flight: FuturesUnordered<_> = fresh
            .iter()
            .map(|candidate| {
                publish_item(
                    &self.fetcher,
                    candidate,
                    &self.output_root,
                    &base_url,
                    &self.gate,
                )
                .map(move |outcome| (candidate, outcome))
            })
            .collect();

        while let Some((candidate, outcome)) = in_flight.next().await {
            match outcome {
                Ok(published) => {
                    tracing::info!(
                        "Published '{}' to {} ({} secondary downloaded, {} failed)",
                        published.title,
                        published.folder.display(),
                        published.secondary.downloaded,
                        published.secondary.failed.len()
                    );
                    stats.record_success(&published.identity, published.secondary.failed.len());
                    self.dedup.record(published.identity);
                }
                Err(e) => {
                    tracing::warn!("Failed to publish '{}': {}", candidate.title, e);
                    stats.record_failure();
                }
            }
        }

        stats.elapsed = started.elapsed();
        stats.log_summary();
        Ok(stats)
    }
}
