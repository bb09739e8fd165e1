//! High-level MCP client.
//!
//! Wraps a transport and provides the two operations the bridge needs:
//! `call_tool` and `list_tools`. The client holds no per-call mutable state;
//! it can be shared behind an `Arc` and any number of calls may be in flight
//! concurrently.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::transport::{McpTransport, TransportError};
use super::types::{error_codes, CallToolRequest, JsonRpcResponse, ListToolsResult, RemoteTool};

/// Errors that can occur during MCP client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The operation name was empty or blank.
    #[error("invalid operation name: {0}")]
    InvalidOperation(String),

    /// Transport-level failure (network, timeout, HTTP status).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The endpoint returned a JSON-RPC error object.
    #[error("server error {code}: {message}")]
    Server {
        /// JSON-RPC error code.
        code: i32,
        /// Error message.
        message: String,
        /// Optional additional error data.
        data: Option<Value>,
    },

    /// The response envelope could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// Check if this error is a transport timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(t) if t.is_timeout())
    }

    /// Check if the endpoint rejected the operation as unknown.
    pub fn is_unknown_operation(&self) -> bool {
        matches!(
            self,
            ClientError::Server { code, .. } if *code == error_codes::METHOD_NOT_FOUND
        )
    }
}

/// MCP client for invoking remote tools.
pub struct McpClient {
    transport: Arc<dyn McpTransport>,
}

impl fmt::Debug for McpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpClient").finish_non_exhaustive()
    }
}

impl McpClient {
    /// Create a new client over the given transport.
    pub fn new(transport: Arc<dyn McpTransport>) -> Self {
        Self { transport }
    }

    /// Call a named remote tool with the given arguments.
    ///
    /// Issues exactly one `tools/call` request; the arguments map is passed
    /// through unvalidated beyond the non-empty operation name (the endpoint
    /// validates parameter names against its own schema). Returns the result
    /// payload on success.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Map<String, Value>,
    ) -> Result<Value, ClientError> {
        if name.trim().is_empty() {
            return Err(ClientError::InvalidOperation(
                "operation name must not be empty".to_string(),
            ));
        }

        debug!(tool = name, "calling remote tool");

        let request = CallToolRequest {
            name: name.to_string(),
            arguments,
        };
        let params = serde_json::to_value(&request)
            .map_err(|e| ClientError::Parse(format!("failed to serialize arguments: {}", e)))?;

        let envelope = self.transport.request("tools/call", params).await?;
        Self::unwrap_envelope(envelope)
    }

    /// List the tools the endpoint advertises.
    pub async fn list_tools(&self) -> Result<Vec<RemoteTool>, ClientError> {
        let envelope = self
            .transport
            .request("tools/list", serde_json::json!({}))
            .await?;
        let result = Self::unwrap_envelope(envelope)?;

        let parsed: ListToolsResult = serde_json::from_value(result)
            .map_err(|e| ClientError::Parse(format!("invalid tools/list result: {}", e)))?;
        Ok(parsed.tools)
    }

    /// Check if the endpoint is reachable and healthy.
    pub async fn is_healthy(&self) -> bool {
        self.transport.is_healthy().await
    }

    /// Extract the result from a JSON-RPC response envelope, surfacing a
    /// server-side error object as `ClientError::Server`.
    fn unwrap_envelope(envelope: Value) -> Result<Value, ClientError> {
        let response: JsonRpcResponse = serde_json::from_value(envelope)
            .map_err(|e| ClientError::Parse(format!("failed to parse response: {}", e)))?;

        if let Some(error) = response.error {
            return Err(ClientError::Server {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        response
            .result
            .ok_or_else(|| ClientError::Parse("response missing result field".to_string()))
    }
}
