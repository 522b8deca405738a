//! Same-origin relay for the notarization webhook.

use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("request body is not JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned {status} with a non-JSON body: {source}")]
    UpstreamNotJson {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Upstream status and JSON body, passed back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: Value,
}

/// Forwards JSON bodies to a fixed upstream URL.
#[derive(Debug, Clone)]
pub struct NotarizeRelay {
    client: reqwest::Client,
    upstream: String,
}

impl NotarizeRelay {
    pub fn new(upstream: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), upstream)
    }

    pub fn with_client(client: reqwest::Client, upstream: impl Into<String>) -> Self {
        Self {
            client,
            upstream: upstream.into(),
        }
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// POST `body` upstream byte-for-byte once it is known to be JSON.
    ///
    /// Any upstream status is returned as-is; only transport failures and
    /// undecodable bodies are errors.
    pub async fn forward(&self, body: Bytes) -> Result<RelayResponse, RelayError> {
        serde_json::from_slice::<Value>(&body).map_err(RelayError::InvalidBody)?;

        let resp = self
            .client
            .post(&self.upstream)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let raw = resp.bytes().await?;
        let body = serde_json::from_slice(&raw)
            .map_err(|source| RelayError::UpstreamNotJson { status, source })?;

        tracing::debug!(upstream = %self.upstream, status, "Notarize relay response");
        Ok(RelayResponse { status, body })
    }
}
