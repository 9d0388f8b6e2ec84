//! # Spotify Integration Module
//!
//! This module is the only place where the playlist sorter talks to the
//! Spotify Web API. Every request goes through [`SpotifyContext::send`], which
//! attaches the bearer token and applies one shared [`RetryPolicy`] so all
//! call sites behave the same way on failure.
//!
//! ## Architecture
//!
//! ```text
//! CLI workflow (cli::sort)
//!          ↓
//! Management (sorter, writer)
//!          ↓
//! Spotify Integration Layer
//!     ├── Playlist Operations (resolve, fetch, create, remove, add)
//!     └── Audio Features (one vector per track)
//!          ↓
//! SpotifyContext (token, default headers, retry policy)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Retry Strategy
//!
//! - **Retried**: `429 Too Many Requests`, any `5xx`, connection errors and
//!   timeouts
//! - **Delay**: the `Retry-After` header when present, exponential backoff
//!   otherwise, capped at [`RetryPolicy::max_delay`]
//! - **Bounded**: after [`RetryPolicy::max_retries`] retries the request
//!   fails with [`Error::RetriesExhausted`]
//! - **Not retried**: every other non-success status fails immediately with
//!   [`Error::Status`]
//!
//! Waits longer than [`MAX_RETRY_AFTER_SECS`] are not honoured; the request
//! fails with [`Error::RateLimited`] instead.

pub mod features;
pub mod playlist;

use std::time::Duration;

use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER},
};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config,
    error::{Error, Result},
    warning,
};

/// Longest `Retry-After` the client is willing to wait for.
pub const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Bounded retry with exponential backoff, shared by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: config::DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(config::DEFAULT_RETRY_BASE_MS),
            max_delay: Duration::from_millis(config::DEFAULT_RETRY_MAX_MS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config() -> Self {
        RetryPolicy {
            max_retries: config::max_retries(),
            base_delay: config::retry_base_delay(),
            max_delay: config::retry_max_delay(),
        }
    }

    /// Retries `max_retries` times without waiting in between.
    pub fn immediate(max_retries: u32) -> Self {
        RetryPolicy {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retrying after the given (1-based) failed attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Everything a request to the Spotify Web API needs.
///
/// Built once per run and passed by reference to every stage, so the token,
/// the base headers and the retry policy are never re-derived per call.
#[derive(Debug, Clone)]
pub struct SpotifyContext {
    client: Client,
    token: String,
    api_url: String,
    retry: RetryPolicy,
}

impl SpotifyContext {
    /// Creates a context for `api_url` with the JSON, keep-alive and
    /// no-cache headers set on every request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be built.
    pub fn new(
        token: impl Into<String>,
        api_url: impl Into<String>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder().default_headers(headers).build()?;
        let api_url: String = api_url.into();

        Ok(SpotifyContext {
            client,
            token: token.into(),
            api_url: api_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// Creates a context from the configured API URL and retry settings.
    pub fn from_config(token: &str) -> Result<Self> {
        Self::new(token, config::spotify_apiurl(), RetryPolicy::from_config())
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Joins `path` onto the API base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Sends the request produced by `build` until it succeeds or the retry
    /// policy gives up.
    ///
    /// `build` is called once per attempt since a request builder cannot be
    /// reused after sending. Only use this for requests that are safe to
    /// repeat; see [`SpotifyContext::send_once`].
    pub async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        self.execute(build, true).await
    }

    /// Sends a request that must not take effect twice, such as appending
    /// tracks or creating a playlist.
    ///
    /// Retries only when the server provably did not act on the request: a
    /// 429 answer or a failure to connect. A 5xx, a timeout or a broken
    /// connection may have happened after the change was applied, so they
    /// are returned to the caller instead.
    pub async fn send_once<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        self.execute(build, false).await
    }

    async fn execute<F>(&self, build: F, replayable: bool) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let result = build(&self.client).bearer_auth(&self.token).send().await;

            let (last, retry_after) = match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    let url = response.url().to_string();
                    if !is_retryable(status, replayable) {
                        return Err(Error::Status { status, url });
                    }

                    let retry_after = retry_after_secs(&response);
                    if let Some(secs) = retry_after {
                        if secs > MAX_RETRY_AFTER_SECS {
                            return Err(Error::RateLimited {
                                url,
                                retry_after: secs,
                            });
                        }
                    }

                    (
                        format!("{} returned {}", url, status),
                        retry_after.map(Duration::from_secs),
                    )
                }
                Err(err) if is_transient(&err, replayable) => (err.to_string(), None),
                Err(err) => return Err(err.into()),
            };

            if attempt > self.retry.max_retries {
                return Err(Error::RetriesExhausted {
                    attempts: attempt,
                    last,
                });
            }

            let delay = retry_after.unwrap_or_else(|| self.retry.backoff(attempt));
            warning!(
                "{}, retrying in {:?} (attempt {}/{})",
                last,
                delay,
                attempt,
                self.retry.max_retries + 1
            );
            sleep(delay).await;
        }
    }
}

/// Parses the body of a successful response.
///
/// A body that does not match `T` is a [`Error::Decode`], never a retry.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn is_retryable(status: StatusCode, replayable: bool) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || (replayable && status.is_server_error())
}

fn is_transient(err: &reqwest::Error, replayable: bool) -> bool {
    err.is_connect() || (replayable && (err.is_timeout() || err.is_request()))
}

fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}
