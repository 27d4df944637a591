//! HTTP transport backed by `reqwest`.
//!
//! One `reqwest::Client` per transport (connection reuse), a fixed
//! per-request timeout, and no retries: every call is exactly one request.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use chainquery_core::error::TransportError;
use chainquery_core::request::{JsonRpcRequest, JsonRpcResponse};
use chainquery_core::transport::{normalize_base_url, RpcTransport};

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub request_timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP transport for a single node base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: String,
    http: reqwest::Client,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for `url`. A single trailing slash is stripped.
    pub fn new(url: impl AsRef<str>, config: HttpTransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Http(format!("failed to build HTTP client: {e}")))?;
        let url = normalize_base_url(url.as_ref()).to_string();

        tracing::info!(
            url = %url,
            timeout_ms = config.request_timeout.as_millis() as u64,
            "initializing RPC transport"
        );

        Ok(Self {
            url,
            http,
            request_timeout: config.request_timeout,
        })
    }

    /// Create with default configuration.
    pub fn default_for(url: impl AsRef<str>) -> Result<Self, TransportError> {
        Self::new(url, HttpTransportConfig::default())
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }
        } else if e.is_connect() {
            TransportError::Connect {
                url: self.url.clone(),
                reason: e.to_string(),
            }
        } else {
            TransportError::Http(e.to_string())
        }
    }

    async fn read_json(&self, resp: reqwest::Response) -> Result<Value, TransportError> {
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| self.map_reqwest_error(e))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: serde_json::from_slice(&bytes).ok(),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        tracing::debug!(url = %self.url, method = %req.method, "sending JSON-RPC request");

        let resp = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let body = self.read_json(resp).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        let endpoint = format!("{}{}", self.url, path);
        tracing::debug!(url = %endpoint, "sending GET request");

        let resp = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.read_json(resp).await
    }

    fn url(&self) -> &str {
        &self.url
    }
}
