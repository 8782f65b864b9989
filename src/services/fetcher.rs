use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// A single source's fetch failed. Contained at the per-source level: the
/// refresh cycle logs it and continues with the remaining sources.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Bounded-timeout HTTP retrieval of playlist text.
#[derive(Clone)]
pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    pub fn new(user_agent: &str, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_millis(timeout_ms))
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch a URL and return the body as text.
    ///
    /// Non-success statuses, timeouts, and connection errors are all reported
    /// as [`FetchError`]; an empty body on a 200 is a success with zero bytes,
    /// which is distinct from a failure.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e)
            }
        })?;

        Ok(body)
    }
}
