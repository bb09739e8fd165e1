//! MCP (Model Context Protocol) client support.
//!
//! Layered like the wire: `types` holds the JSON-RPC envelopes, `transport`
//! moves them over HTTP, and `client` exposes the tool operations the bridge
//! consumes.

pub mod client;
pub mod transport;
pub mod types;

pub use client::{ClientError, McpClient};
pub use transport::{HttpTransport, McpTransport, TransportConfig, TransportError};
