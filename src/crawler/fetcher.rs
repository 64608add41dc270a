//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests returning page text
//! - GET requests streamed straight into a file
//! - Error classification (status vs transport vs local IO)

use crate::config::HttpConfig;
use crate::FetchError;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// A source of web resources
///
/// Every call is one request/response cycle. Non-success statuses and
/// transport errors are both reported as [`FetchError`]s naming the URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a page and returns its body as text
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Streams a resource into `dest`, returning the number of bytes written
    ///
    /// On failure no file is left at `dest`.
    async fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use newsreel::config::HttpConfig;
/// use newsreel::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the HTTP configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Sends a GET and enforces the success-status contract
    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| FetchError::transport(url, e))
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self.get(url).await?;

        let io_error = |source| FetchError::Io {
            url: url.to_string(),
            path: dest.to_path_buf(),
            source,
        };

        let mut file = File::create(dest).await.map_err(io_error)?;
        let result = stream_to_file(&mut file, response, url, dest).await;
        drop(file);

        if result.is_err() {
            let _ = tokio::fs::remove_file(dest).await;
        }
        result
    }
}

/// Streams a response body to a file, returning bytes written
async fn stream_to_file(
    file: &mut File,
    response: Response,
    url: &str,
    dest: &Path,
) -> Result<u64, FetchError> {
    let io_error = |source| FetchError::Io {
        url: url.to_string(),
        path: dest.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::transport(url, e))?;
        writer.write_all(&chunk).await.map_err(io_error)?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(io_error)?;
    Ok(bytes_written)
}
