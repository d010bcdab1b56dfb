//! # Upstream Directory Client
//!
//! Wrapper around the remote directory REST API.
//!
//! The upstream publishes `{ success, message, data }` envelopes. This
//! client unwraps them into raw record batches; the engine side of the
//! contract is "accept whatever comes back": `fetch_or_empty` degrades a
//! failed or malformed fetch to an empty batch so a network problem never
//! propagates into the query engine.

use crate::config::UpstreamConfig;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use uniscout_core::RawUniversity;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from the upstream HTTP layer.
#[derive(Debug)]
pub enum UpstreamError {
    /// Cannot reach the directory API.
    ConnectionFailed(String),
    /// Non-success HTTP status.
    Status(u16, String),
    /// The response body was not the expected envelope.
    ParseError(String),
    /// The envelope arrived but reported failure.
    Rejected(String),
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to directory API at {url}"),
            Self::Status(status, msg) => write!(f, "Directory API error ({status}): {msg}"),
            Self::ParseError(msg) => write!(f, "Directory API parse error: {msg}"),
            Self::Rejected(msg) => write!(f, "Directory API rejected request: {msg}"),
        }
    }
}

impl std::error::Error for UpstreamError {}

// =============================================================================
// ENVELOPE
// =============================================================================

/// The upstream response envelope. All fields tolerant.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the upstream directory API.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    /// Create a client from the upstream configuration.
    #[must_use]
    pub fn new(config: &UpstreamConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/universities` — the full raw record batch.
    pub async fn fetch_universities(&self) -> Result<Vec<RawUniversity>, UpstreamError> {
        let data = self.fetch_envelope("/universities").await?;
        let items = match data {
            Value::Array(items) => items,
            other => {
                return Err(UpstreamError::ParseError(format!(
                    "expected an array of records, got {}",
                    type_name(&other)
                )));
            }
        };
        Ok(items.into_iter().map(RawUniversity::from_value).collect())
    }

    /// Fetch, degrading any failure to an empty batch.
    ///
    /// The failure is logged and surfaced to the caller as a display
    /// message; the engine still gets a usable (empty) snapshot.
    pub async fn fetch_or_empty(&self) -> (Vec<RawUniversity>, Option<String>) {
        match self.fetch_universities().await {
            Ok(batch) => (batch, None),
            Err(e) => {
                tracing::warn!("Upstream fetch failed, degrading to empty batch: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        }
    }

    /// `GET {base}/notification` — current notification list.
    pub async fn fetch_notifications(&self) -> Result<Vec<Value>, UpstreamError> {
        let data = self.fetch_envelope("/notification").await?;
        match data {
            Value::Array(items) => Ok(items),
            other => Err(UpstreamError::ParseError(format!(
                "expected an array of notifications, got {}",
                type_name(&other)
            ))),
        }
    }

    /// GET a path and unwrap the `{success, message, data}` envelope.
    async fn fetch_envelope(&self, path: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::ConnectionFailed(format!("{}: {e}", url)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Status(status.as_u16(), truncate(&body)));
        }

        let envelope: Envelope = resp
            .json()
            .await
            .map_err(|e| UpstreamError::ParseError(e.to_string()))?;

        if envelope.success == Some(false) {
            return Err(UpstreamError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "no message given".to_string()),
            ));
        }
        Ok(envelope.data.unwrap_or(Value::Null))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Cap error bodies so a misbehaving upstream cannot flood the logs.
fn truncate(body: &str) -> String {
    const MAX: usize = 256;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}

// =============================================================================
// TESTS
// =============================================================================
