//! Bridge between an LLM agent runtime and a remote MCP tool endpoint.
//!
//! The agent runtime sees a set of named, schema-typed tools; each tool call
//! is forwarded as a JSON-RPC request over HTTP to an MCP server that does
//! the real work. The crate has three layers:
//! - `mcp`: JSON-RPC types, HTTP transport, and the protocol client
//! - `tools`: synchronous tool adapters and the explicit registry
//! - `config`: environment-driven wiring of all of the above

pub mod config;
pub mod mcp;
pub mod tools;

pub use config::{BridgeConfig, ConfigError};
pub use mcp::{ClientError, HttpTransport, McpClient, McpTransport, TransportConfig, TransportError};
pub use tools::{
    FailurePolicy, GitHubIssuesAdapter, RegistryError, ToolAdapter, ToolDescriptor, ToolError,
    ToolRegistry,
};

/// Install the global tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to debug for this crate and info elsewhere.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("backlog_bridge=debug,info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
