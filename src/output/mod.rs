//! Output module for crawl reporting
//!
//! Published items are the crawler's real output and live in the output
//! root; this module holds the per-cycle statistics that end up in the log.

pub mod stats;

pub use stats::CycleStats;
