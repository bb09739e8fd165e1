//! HTTP transport tests against a local mock MCP endpoint.

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use backlog_bridge::mcp::transport::{HttpTransport, McpTransport, TransportConfig, TransportError};
use backlog_bridge::mcp::McpClient;
use backlog_bridge::tools::GitHubIssuesAdapter;

fn transport_for(server: &MockServer, config: TransportConfig) -> HttpTransport {
    HttpTransport::new(&format!("{}/mcp", server.base_url()), config).unwrap()
}

#[tokio::test]
async fn posts_json_rpc_envelope_to_the_endpoint() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/mcp")
            .header("content-type", "application/json")
            .body_contains("\"jsonrpc\":\"2.0\"")
            .body_contains("\"id\":1")
            .body_contains("\"method\":\"tools/call\"")
            .body_contains("\"name\":\"create_issue\"");
        then.status(200).json_body(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"number": 42, "html_url": "https://github.com/x/y/issues/42"},
        }));
    });

    let transport = transport_for(&server, TransportConfig::default());
    let envelope = transport
        .request("tools/call", json!({"name": "create_issue", "arguments": {}}))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(envelope["result"]["number"], 42);
}

#[tokio::test]
async fn sends_bearer_token_when_configured() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/mcp")
            .header("authorization", "Bearer test-token");
        then.status(200)
            .json_body(json!({"jsonrpc": "2.0", "id": 1, "result": {"tools": []}}));
    });

    let transport = transport_for(
        &server,
        TransportConfig::default().with_token("test-token".to_string()),
    );
    transport.request("tools/list", json!({})).await.unwrap();

    mock.assert();
}

#[tokio::test]
async fn method_not_found_surfaces_as_unknown_operation() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/mcp");
        then.status(200).json_body(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "Unknown tool: delete_repo"},
        }));
    });

    let transport = transport_for(&server, TransportConfig::default());
    let client = McpClient::new(Arc::new(transport));

    let mut arguments = serde_json::Map::new();
    arguments.insert("title".to_string(), json!("t"));
    let err = client.call_tool("delete_repo", arguments).await.unwrap_err();

    assert!(err.is_unknown_operation());
}

#[tokio::test]
async fn http_error_status_is_a_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/mcp");
        then.status(500).body("internal server error");
    });

    let transport = transport_for(&server, TransportConfig::default());
    let err = transport.request("tools/list", json!({})).await.unwrap_err();

    assert!(matches!(err, TransportError::Http { status: 500, .. }));
}

#[tokio::test]
async fn non_json_body_is_an_invalid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/mcp");
        then.status(200).body("<html>gateway error</html>");
    });

    let transport = transport_for(&server, TransportConfig::default());
    let err = transport.request("tools/list", json!({})).await.unwrap_err();

    assert!(matches!(err, TransportError::InvalidResponse(_)));
}

#[tokio::test]
async fn lists_remote_tools() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/mcp").body_contains("tools/list");
        then.status(200).json_body(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"tools": [
                {"name": "create_issue", "description": "Create a GitHub issue",
                 "inputSchema": {"type": "object"}},
            ]},
        }));
    });

    let transport = transport_for(&server, TransportConfig::default());
    let client = McpClient::new(Arc::new(transport));

    let tools = client.list_tools().await.unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "create_issue");
}

#[tokio::test]
async fn health_check_probes_healthz() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/healthz");
        then.status(200).json_body(json!({"status": "ok"}));
    });

    let transport = transport_for(&server, TransportConfig::default());
    assert!(transport.is_healthy().await);
    mock.assert();
}

#[tokio::test]
async fn health_check_fails_on_error_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/healthz");
        then.status(503);
    });

    let transport = transport_for(&server, TransportConfig::default());
    assert!(!transport.is_healthy().await);
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/mcp");
        then.status(200)
            .delay(Duration::from_millis(500))
            .json_body(json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
    });

    let transport = transport_for(
        &server,
        TransportConfig::default().with_timeout(Duration::from_millis(50)),
    );
    let err = transport.request("tools/list", json!({})).await.unwrap_err();

    assert!(err.is_timeout());
}

// The adapter call convention is synchronous, so this one runs on a plain
// test thread against a real HTTP server.
#[test]
fn adapter_creates_issue_over_real_http() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/mcp")
            .body_contains("\"owner\":\"octo\"")
            .body_contains("\"repo\":\"backlog\"");
        then.status(200).json_body(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"number": 42, "html_url": "https://github.com/octo/backlog/issues/42"},
        }));
    });

    let transport = transport_for(&server, TransportConfig::default());
    let client = Arc::new(McpClient::new(Arc::new(transport)));
    let adapter = GitHubIssuesAdapter::new(client, "octo", "backlog");

    let result = adapter.create_issue("Fix login", "Session expires early").unwrap();

    mock.assert();
    assert!(result.contains("Issue created successfully"));
    assert!(result.contains("#42"));
}
