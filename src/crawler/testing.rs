//! In-memory fetcher for unit tests

use crate::crawler::fetcher::Fetcher;
use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
enum Canned {
    Body(String),
    Status(u16),
    Hang,
}

/// Serves canned responses by URL and records every request
///
/// Unknown URLs answer 404. An optional delay is applied to every request,
/// and per-URL delays on top of it, which is how tests make work take time
/// under a paused clock.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    responses: HashMap<String, Canned>,
    delay: Option<Duration>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<(String, Instant)>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), Canned::Body(body.to_string()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Canned::Status(status));
        self
    }

    /// The request for `url` never completes
    pub fn with_hang(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), Canned::Hang);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Extra delay applied only to requests for `url`
    pub fn with_delay_for(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.request_times(url).len()
    }

    /// When each request for `url` was issued, in order
    pub fn request_times(&self, url: &str) -> Vec<Instant> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(requested, _)| requested == url)
            .map(|(_, at)| *at)
            .collect()
    }

    async fn respond(&self, url: &str) -> Result<String, FetchError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(url).cloned() {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(Canned::Hang) => std::future::pending().await,
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.respond(url).await
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let body = self.respond(url).await?;
        std::fs::write(dest, body.as_bytes()).map_err(|source| FetchError::Io {
            url: url.to_string(),
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(body.len() as u64)
    }
}
