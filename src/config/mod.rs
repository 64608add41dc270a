//! Configuration module for Newsreel
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key is optional; command-line flags override file values.
//!
//! # Example
//!
//! ```no_run
//! use newsreel::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("newsreel.toml")).unwrap();
//! println!("Taking up to {} items per cycle", config.crawler.max_items);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, OutputConfig, DEFAULT_LISTING_URL,
    DEFAULT_MAX_DETAIL_FETCHES, DEFAULT_MAX_ITEMS, DEFAULT_OUTPUT_FOLDER, DEFAULT_WAIT_SECS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
