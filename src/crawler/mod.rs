//! Crawler module for listing polling and item publication
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a status-code contract
//! - Listing parsing and detail-page link extraction
//! - Staged, atomic publication of items
//! - Cycle scheduling with cadence compensation

mod coordinator;
mod fetcher;
mod links;
mod parser;
mod publisher;
mod scheduler;

#[cfg(test)]
mod testing;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use links::{commentary_links, extract_links};
pub use parser::{parse_listing, ItemCandidate};
pub use publisher::{publish_item, sweep_stale_staging, Published, SecondaryReport, STAGING_PREFIX};
pub use scheduler::{compensated_wait, CycleScheduler};
