// src/application/fetch_client.rs
use crate::config::ApiConfig;
use crate::domain::{ErrorKind, FetchError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Status line and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established or was cut off
    #[error("{0}")]
    Unreachable(String),
    #[error("{0}")]
    Other(String),
}

/// Raw network primitive: one GET, no retries, no deadline.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError>;
}

/// Time capabilities used by the fetch client.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn sleep(&self, duration: Duration);

    /// Runs `fut` to completion or gives up after `limit`, dropping it.
    /// Returns `None` when the deadline passed first.
    async fn with_deadline<F>(&self, limit: Duration, fut: F) -> Option<F::Output>
    where
        F: Future + Send,
        F::Output: Send;
}

/// Map a non-success HTTP status onto the error taxonomy
pub fn classify_status(endpoint: &str, response: &RawResponse) -> Result<(), FetchError> {
    if response.is_success() {
        return Ok(());
    }
    let err = match response.status {
        404 => FetchError::new(ErrorKind::NotFound, format!("Resource not found: {}", endpoint)),
        s if s >= 500 => FetchError::new(
            ErrorKind::ServerError,
            format!("Server error: {}", response.reason),
        ),
        _ => FetchError::new(
            ErrorKind::UnknownError,
            format!("HTTP error: {}", response.reason),
        ),
    };
    Err(err.with_status(response.status))
}

/// Fetches JSON resources with a per-attempt deadline and exponential backoff.
pub struct FetchClient<T: HttpTransport, S: Scheduler> {
    transport: T,
    scheduler: S,
    config: ApiConfig,
}

impl<T: HttpTransport, S: Scheduler> FetchClient<T, S> {
    pub fn new(transport: T, scheduler: S, config: ApiConfig) -> Self {
        Self {
            transport,
            scheduler,
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch and decode `endpoint`, retrying transient failures.
    ///
    /// `NotFound` and `ParseError` are returned on first sight. Other failures are
    /// retried up to `retry_attempts` times in total, sleeping `retry_delay * 2^i`
    /// between attempts; the last failure is returned once attempts run out.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_resource<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, FetchError> {
        let attempts = self.config.retry_attempts;
        let mut last_error: Option<FetchError> = None;

        for attempt in 0..attempts {
            match self.fetch_once(endpoint).await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => {
                    debug!(endpoint, code = %err.kind, "Not retrying");
                    return Err(err);
                }
                Err(err) => {
                    warn!(
                        endpoint,
                        attempt = attempt + 1,
                        attempts,
                        code = %err.kind,
                        error = %err,
                        "Fetch attempt failed"
                    );
                    last_error = Some(err);
                }
            }

            if attempt + 1 < attempts {
                let delay = self.config.backoff(attempt);
                debug!(endpoint, ?delay, "Backing off before retry");
                self.scheduler.sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            FetchError::new(ErrorKind::UnknownError, "Max retry attempts reached")
        }))
    }

    async fn fetch_once<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, FetchError> {
        let url = self.config.url_for(endpoint);
        debug!(%url, "GET");

        let outcome = self
            .scheduler
            .with_deadline(self.config.timeout(), self.transport.get(&url))
            .await;

        let response = match outcome {
            None => {
                return Err(FetchError::new(
                    ErrorKind::TimeoutError,
                    format!("Request timed out after {}ms", self.config.timeout_ms),
                ))
            }
            Some(Err(TransportError::Unreachable(reason))) => {
                debug!(%url, %reason, "Transport unreachable");
                return Err(FetchError::new(
                    ErrorKind::NetworkError,
                    "Network error: Unable to connect to server",
                ));
            }
            Some(Err(TransportError::Other(reason))) => {
                return Err(FetchError::new(ErrorKind::UnknownError, reason));
            }
            Some(Ok(response)) => response,
        };

        classify_status(endpoint, &response)?;

        serde_json::from_slice(&response.body).map_err(|e| {
            debug!(%url, error = %e, "Response body is not the expected JSON");
            FetchError::new(ErrorKind::ParseError, "Failed to parse response as JSON")
        })
    }
}
