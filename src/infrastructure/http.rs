// src/infrastructure/http.rs
use crate::application::{HttpTransport, RawResponse, TransportError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use tracing::{instrument, trace};

const USER_AGENT_VALUE: &str = concat!("flashdeck/", env!("CARGO_PKG_VERSION"), " (+reqwest)");

/// reqwest-backed transport. Deadlines are enforced by the scheduler, not here.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("HTTP client build failed")?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_request() || err.is_body() {
        TransportError::Unreachable(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("").to_string();
        // Headers arrived, so a failed body read means the connection was cut
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;
        trace!(status = status.as_u16(), bytes = body.len(), "Response received");

        Ok(RawResponse {
            status: status.as_u16(),
            reason,
            body: body.to_vec(),
        })
    }
}
