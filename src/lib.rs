//! Newsreel: a recurring news crawler
//!
//! This crate polls a listing page on a fixed cadence, discovers the newest
//! items on it, and publishes every item (its primary resource plus the links
//! referenced from its discussion page) as a self-contained folder.

pub mod config;
pub mod crawler;
pub mod logging;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crawl runs
///
/// Everything that reaches this type ends the run: setup failures and
/// listing failures. Per-item failures are reported through [`PublishError`]
/// and never escape the cycle.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch listing: {0}")]
    Listing(#[source] FetchError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure of a single fetch
///
/// Every variant carries the URL that was being fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to write {url} to {path}: {source}")]
    Io {
        url: String,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } | Self::Io { url, .. } => url,
        }
    }

    /// HTTP status code, when the failure was a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn transport(url: &str, error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timeout".to_string()
        } else if error.is_connect() {
            format!("connection failed: {}", error)
        } else {
            error.to_string()
        };
        Self::Transport {
            url: url.to_string(),
            message,
        }
    }
}

/// Failure that is fatal to one item
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("primary download failed: {0}")]
    Primary(#[source] FetchError),

    #[error("detail page fetch failed: {0}")]
    Detail(#[source] FetchError),

    #[error("staging error on {path}: {source}")]
    Staging {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PublishError {
    pub(crate) fn staging(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Staging {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, CycleScheduler, Fetcher, HttpFetcher, ItemCandidate};
pub use output::CycleStats;
pub use state::DedupTracker;
pub use crate::url::{derive_file_name, qualify_url, sanitize_title};
