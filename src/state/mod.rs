//! State module for tracking crawl progress
//!
//! The only state that outlives a cycle is the set of item identities that
//! were already published; it lives in memory for the process lifetime.

mod dedup;

pub use dedup::DedupTracker;
