//! Scripted in-process transport for bridge integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use backlog_bridge::mcp::transport::{McpTransport, TransportError};
use backlog_bridge::mcp::types::{JsonRpcResponse, RequestId};

/// A transport that returns scripted JSON-RPC envelopes and records every
/// request it receives.
///
/// When the script runs dry it switches to echo mode: each `tools/call`
/// succeeds with `{number, html_url}` where the URL embeds the request's
/// title, so concurrent callers can verify they got their own response back.
pub struct MockTransport {
    script: Mutex<VecDeque<Result<Value, TransportError>>>,
    requests: Mutex<Vec<(String, Value)>>,
    issue_counter: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            issue_counter: AtomicUsize::new(0),
        }
    }

    /// Queue a successful response with the given `result` payload.
    pub fn push_result(&self, result: Value) {
        let envelope =
            serde_json::to_value(JsonRpcResponse::success(RequestId::Number(1), result)).unwrap();
        self.script.lock().unwrap().push_back(Ok(envelope));
    }

    /// Queue a JSON-RPC error envelope with the given code and message.
    pub fn push_rpc_error(&self, code: i64, message: &str) {
        let envelope = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": code, "message": message},
        });
        self.script.lock().unwrap().push_back(Ok(envelope));
    }

    /// Queue a transport-level failure.
    pub fn push_failure(&self, error: TransportError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    fn echo_response(&self, params: &Value) -> Value {
        let number = self.issue_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let title = params
            .get("arguments")
            .and_then(|a| a.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("untitled");
        serde_json::to_value(JsonRpcResponse::success(
            RequestId::Number(number as i64),
            json!({
                "number": number,
                "html_url": format!("https://github.com/x/y/issues/{}?title={}", number, title),
            }),
        ))
        .unwrap()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl McpTransport for MockTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((method.to_string(), params.clone()));

        if let Some(scripted) = self.script.lock().unwrap().pop_front() {
            return scripted;
        }
        Ok(self.echo_response(&params))
    }

    async fn is_healthy(&self) -> bool {
        true
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
