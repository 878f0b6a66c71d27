//! Retrying HTTP fetch wrapper shared by every remote source.
//!
//! Each attempt runs under a timeout ceiling. Non-2xx responses, timeouts
//! and transport errors are retried up to `max_retries` times with a fixed
//! or linear delay, then surfaced as [`CorpusError::SourceUnavailable`].
//! A successful response with an empty payload is returned as-is; deciding
//! whether it is useful is the caller's business.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::error::{CorpusError, Result};

// ============================================================================
// Constants
// ============================================================================

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// ============================================================================
// RetryPolicy
// ============================================================================

/// Delay growth between retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed,
    /// `retry_delay * n` before the n-th retry.
    Linear,
}

/// Retry and timeout settings.
///
/// # Defaults
///
/// - `max_retries`: 2
/// - `retry_delay_ms`: 500
/// - `backoff`: fixed
/// - `timeout_ms`: 30000
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub backoff: Backoff,
    /// Ceiling for a single attempt, including reading the body.
    pub timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            backoff: Backoff::Fixed,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl RetryPolicy {
    /// No retries, short timeout. Useful for tests.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            retry_delay_ms: 0,
            backoff: Backoff::Fixed,
            timeout_ms: 5_000,
        }
    }

    pub fn retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn delay_ms(mut self, delay: u64) -> Self {
        self.retry_delay_ms = delay;
        self
    }

    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.timeout_ms = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let base = Duration::from_millis(self.retry_delay_ms);
        match self.backoff {
            Backoff::Fixed => base,
            Backoff::Linear => base * retry.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

// ============================================================================
// Fetcher
// ============================================================================

/// HTTP GET with bounded retries. Cheap to clone; holds no mutable state.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_client(reqwest::Client::new(), policy)
    }

    pub fn with_client(client: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch a body as text, retrying per policy.
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(url = %url, attempt, "GET");

            match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        url = %url,
                        attempt,
                        retries_left = max_attempts - attempt,
                        error = %err,
                        "request failed, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) if err.is_retryable() => {
                    warn!(url = %url, attempts = attempt, error = %err, "request failed, giving up");
                    return Err(CorpusError::SourceUnavailable {
                        url: url.to_string(),
                        attempts: attempt,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Fetch and decode a JSON body. Decode failures are not retried.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url, what: &str) -> Result<T> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| CorpusError::decode(what, e))
    }

    async fn attempt(&self, url: &Url) -> Result<String> {
        let timeout = self.policy.timeout();
        let request = async {
            let response = self
                .client
                .get(url.clone())
                .header(ACCEPT, "application/json, text/csv, */*")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(CorpusError::HttpStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            Ok(response.text().await?)
        };

        match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(CorpusError::Timeout {
                url: url.to_string(),
                elapsed: timeout,
            }),
        }
    }
}
