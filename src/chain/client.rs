//! Option-Chain Sources
//!
//! Fetches raw snapshots for the normalizer. `NseClient` talks to the NSE
//! website: it primes a session cookie from the home page, sends
//! browser-like headers and retries a fixed number of times with a flat
//! delay. `FileSnapshotSource` replays a saved JSON snapshot.

use super::snapshot::RawSnapshot;
use crate::types::BotConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

const NSE_HOME_URL: &str = "https://www.nseindia.com";
const NSE_CHAIN_URL: &str = "https://www.nseindia.com/api/option-chain-indices";

/// Why a snapshot could not be produced this cycle
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed option-chain payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read snapshot file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("all {attempts} attempts to fetch the option chain failed")]
    Exhausted { attempts: u32 },
}

/// Anything that can produce a raw option-chain snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<RawSnapshot, FeedError>;

    /// Short label for logs
    fn describe(&self) -> String;
}

/// NSE option-chain HTTP client
pub struct NseClient {
    client: reqwest::Client,
    chain_url: String,
    home_url: String,
    attempts: u32,
    retry_delay: Duration,
}

impl NseClient {
    pub fn new(config: &BotConfig) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.nseindia.com/"));

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            chain_url: format!("{}?symbol={}", NSE_CHAIN_URL, config.symbol),
            home_url: NSE_HOME_URL.to_string(),
            attempts: config.fetch_attempts.max(1),
            retry_delay: Duration::from_millis(config.fetch_retry_delay_ms),
        })
    }

    /// Override the endpoints (mirrors or local fixtures)
    pub fn with_urls(mut self, home_url: impl Into<String>, chain_url: impl Into<String>) -> Self {
        self.home_url = home_url.into();
        self.chain_url = chain_url.into();
        self
    }

    pub fn chain_url(&self) -> &str {
        &self.chain_url
    }

    async fn fetch_once(&self) -> Result<RawSnapshot, FeedError> {
        // Home page visit sets the cookies the API insists on
        self.client.get(&self.home_url).send().await?;

        let response = self.client.get(&self.chain_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl SnapshotSource for NseClient {
    async fn fetch_snapshot(&self) -> Result<RawSnapshot, FeedError> {
        for attempt in 1..=self.attempts {
            match self.fetch_once().await {
                Ok(snapshot) => {
                    debug!("Option chain fetched on attempt {}", attempt);
                    return Ok(snapshot);
                }
                Err(e) => {
                    warn!("Attempt {} failed: {}", attempt, e);
                    if attempt < self.attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        error!("❌ All attempts to fetch NSE data failed.");
        Err(FeedError::Exhausted {
            attempts: self.attempts,
        })
    }

    fn describe(&self) -> String {
        format!("NSE {}", self.chain_url)
    }
}

/// Replays a snapshot saved from the NSE API
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        info!("Using snapshot file {}", path.display());
        Self { path }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<RawSnapshot, FeedError> {
        let content = tokio::fs::read(&self.path).await.map_err(|source| FeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_slice(&content)?)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
