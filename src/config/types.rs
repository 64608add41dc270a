use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_LISTING_URL: &str = "https://news.ycombinator.com/";
pub const DEFAULT_MAX_ITEMS: usize = 5;
pub const DEFAULT_WAIT_SECS: u64 = 30;
pub const DEFAULT_MAX_DETAIL_FETCHES: usize = 3;
pub const DEFAULT_OUTPUT_FOLDER: &str = "news";

/// Main configuration structure for Newsreel
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Crawl cycle configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Listing page polled every cycle
    pub listing_url: String,

    /// Base URL used to qualify scheme-less links (defaults to the listing URL)
    pub base_url: Option<String>,

    /// Maximum number of items taken from the listing per cycle
    pub max_items: usize,

    /// Time between cycle starts (seconds)
    pub wait_secs: u64,

    /// Maximum number of detail pages fetched at the same time
    pub max_concurrent_detail_fetches: usize,

    /// Number of cycles to run; runs forever when unset
    pub cycles: Option<u32>,
}

impl CrawlerConfig {
    /// Base URL for qualifying relative links, always ending in `/`
    ///
    /// An explicit base gets a trailing `/` if it lacks one. Otherwise the
    /// listing URL's directory is used, so `https://news.ycombinator.com` and
    /// `https://news.ycombinator.com/newest` both yield
    /// `https://news.ycombinator.com/`.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(base) => with_trailing_slash(base),
            None => Url::parse(&self.listing_url)
                .and_then(|listing| listing.join("./"))
                .map(String::from)
                .unwrap_or_else(|_| with_trailing_slash(&self.listing_url)),
        }
    }

    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            base_url: None,
            max_items: DEFAULT_MAX_ITEMS,
            wait_secs: DEFAULT_WAIT_SECS,
            max_concurrent_detail_fetches: DEFAULT_MAX_DETAIL_FETCHES,
            cycles: None,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Whole request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Root folder that receives one sub-folder per published item
    pub folder: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from(DEFAULT_OUTPUT_FOLDER),
        }
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
