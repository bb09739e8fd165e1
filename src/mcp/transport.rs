//! MCP transport layer.
//!
//! The bridge talks to a remote MCP endpoint over HTTP: each JSON-RPC request
//! is one POST carrying the envelope, and the response body carries the
//! matching envelope back. The transport enforces the request timeout; it does
//! not retry — a failed call surfaces to the caller, and any retry policy
//! belongs to the surrounding agent runtime.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, trace};

use super::types::{JsonRpcRequest, RequestId};

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors specific to transport operations.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// Connection-level failure (refused, DNS, TLS, aborted).
    #[error("connection error: {0}")]
    Connection(String),

    /// The request exceeded the transport timeout.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body was not a JSON-RPC envelope.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Request serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The transport configuration is unusable.
    #[error("transport configuration error: {0}")]
    Config(String),
}

impl TransportError {
    /// Create a connection error from any error type.
    pub fn connection<E: std::fmt::Display>(err: E) -> Self {
        TransportError::Connection(err.to_string())
    }

    /// Check if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

/// Configuration for MCP transports.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Bearer token for authentication.
    pub token: Option<String>,
    /// Custom HTTP headers to include in requests.
    pub headers: HashMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            token: None,
            headers: HashMap::new(),
        }
    }
}

impl TransportConfig {
    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Trait for MCP transports.
///
/// Implementations carry no per-call mutable state: `request` takes `&self`
/// and any number of calls may be in flight concurrently. Tests supply mock
/// implementations.
#[async_trait]
pub trait McpTransport: Send + Sync {
    /// Send a JSON-RPC request and return the full response envelope.
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;

    /// Check if the endpoint is reachable and healthy.
    async fn is_healthy(&self) -> bool;

    /// Close the transport connection.
    async fn close(&self) -> Result<(), TransportError>;
}

/// HTTP transport for remote MCP endpoints.
///
/// Wraps a pooled `reqwest` client; the pool is shared across calls and no
/// locking exists above it.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    headers: reqwest::header::HeaderMap,
    next_id: AtomicI64,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport for the given endpoint URL
    /// (e.g. `http://localhost:3333/mcp`).
    pub fn new(endpoint: impl Into<String>, config: TransportConfig) -> Result<Self, TransportError> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(TransportError::Config(format!(
                "invalid endpoint scheme: {}",
                endpoint
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Config(format!("failed to build HTTP client: {}", e)))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        if let Some(token) = &config.token {
            let value = format!("Bearer {}", token)
                .parse()
                .map_err(|e| TransportError::Config(format!("invalid bearer token: {}", e)))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        for (key, value) in &config.headers {
            let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| TransportError::Config(format!("invalid header name '{}': {}", key, e)))?;
            let value = value
                .parse()
                .map_err(|e| TransportError::Config(format!("invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            headers,
            next_id: AtomicI64::new(1),
            timeout: config.timeout,
        })
    }

    /// Origin of the endpoint URL (scheme + host + port), used for the
    /// health check path.
    fn origin(&self) -> &str {
        match self.endpoint.find("://") {
            Some(scheme_end) => {
                let rest = &self.endpoint[scheme_end + 3..];
                match rest.find('/') {
                    Some(path_start) => &self.endpoint[..scheme_end + 3 + path_start],
                    None => &self.endpoint,
                }
            }
            None => &self.endpoint,
        }
    }
}

#[async_trait]
impl McpTransport for HttpTransport {
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        trace!(method, id, "sending MCP HTTP request");

        let request_body = JsonRpcRequest::new(RequestId::Number(id), method, Some(params));

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(self.timeout)
                } else {
                    TransportError::connection(format!("HTTP request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Http { status, message });
        }

        let body = response.text().await.map_err(|e| {
            TransportError::InvalidResponse(format!("failed to read response body: {}", e))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(240).collect();
            TransportError::InvalidResponse(format!(
                "failed to parse response body: {}. Body preview: {}",
                e, preview
            ))
        })
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/healthz", self.origin());
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("health check against {} failed: {}", url, e);
                false
            }
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        // The pooled client tears itself down on drop.
        Ok(())
    }
}
