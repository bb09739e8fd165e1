//! GitHub issue tools backed by a remote MCP endpoint.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::mcp::McpClient;
use crate::tools::types::{
    FailurePolicy, ParamType, ToolAdapter, ToolDescriptor, ToolError, ToolParam,
};

const CREATE_ISSUE: &str = "create_issue";

/// Tool adapter for issue operations on one GitHub repository.
///
/// The owner/repo scope is bound at construction and injected into every
/// remote call; callers never supply it. Holds no mutable state, so one
/// instance serves concurrent invocations.
pub struct GitHubIssuesAdapter {
    client: Arc<McpClient>,
    owner: String,
    repo: String,
    policy: FailurePolicy,
}

impl GitHubIssuesAdapter {
    /// Create an adapter bound to `owner/repo`, reporting failures as strings.
    pub fn new(client: Arc<McpClient>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
            policy: FailurePolicy::default(),
        }
    }

    /// Set the failure escalation policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create an issue in the bound repository.
    ///
    /// Blocks the calling thread until the remote call completes; the only
    /// timeout is the protocol client's own. Blank title or body is rejected
    /// before any network call.
    pub fn create_issue(&self, title: &str, body: &str) -> Result<String, ToolError> {
        let title = title.trim();
        let body = body.trim();

        if title.is_empty() {
            return self.fail(ToolError::InvalidInput(
                "issue title must not be blank".to_string(),
            ));
        }
        if body.is_empty() {
            return self.fail(ToolError::InvalidInput(
                "issue body must not be blank".to_string(),
            ));
        }

        let mut arguments = serde_json::Map::new();
        arguments.insert("title".to_string(), Value::String(title.to_string()));
        arguments.insert("body".to_string(), Value::String(body.to_string()));
        arguments.insert("owner".to_string(), Value::String(self.owner.clone()));
        arguments.insert("repo".to_string(), Value::String(self.repo.clone()));

        debug!(owner = %self.owner, repo = %self.repo, "creating issue via MCP");

        match super::block_on(self.client.call_tool(CREATE_ISSUE, arguments)) {
            Ok(payload) => Ok(format_created(&payload)),
            Err(err) => {
                warn!(owner = %self.owner, repo = %self.repo, "create_issue failed: {}", err);
                self.fail(ToolError::Execution(err.to_string()))
            }
        }
    }

    /// Apply the failure policy: report as a legible string or escalate.
    fn fail(&self, err: ToolError) -> Result<String, ToolError> {
        match self.policy {
            FailurePolicy::Report => Ok(format!("Failed to create issue: {}", err)),
            FailurePolicy::Escalate => Err(err),
        }
    }
}

/// Build the success confirmation from the result payload.
///
/// The endpoint returns `{number, html_url}` for a created issue; fall back
/// to echoing the raw payload when the shape differs so the model still sees
/// what happened.
fn format_created(payload: &Value) -> String {
    let number = payload.get("number").and_then(Value::as_i64);
    let url = payload.get("html_url").and_then(Value::as_str);

    match (number, url) {
        (Some(number), Some(url)) => {
            format!("Issue created successfully: #{} ({})", number, url)
        }
        (Some(number), None) => format!("Issue created successfully: #{}", number),
        _ => format!("Issue created successfully. Response: {}", payload),
    }
}

impl ToolAdapter for GitHubIssuesAdapter {
    fn descriptors(&self) -> Vec<ToolDescriptor> {
        vec![ToolDescriptor {
            name: CREATE_ISSUE.to_string(),
            description: format!(
                "Create a new issue in the {}/{} GitHub repository.",
                self.owner, self.repo
            ),
            params: vec![
                ToolParam::required("title", ParamType::String, "Title of the issue"),
                ToolParam::required("body", ParamType::String, "Body text of the issue"),
            ],
        }]
    }

    fn invoke(
        &self,
        name: &str,
        args: &serde_json::Map<String, Value>,
    ) -> Result<String, ToolError> {
        match name {
            // Destructure the untyped map into the typed call immediately.
            CREATE_ISSUE => {
                let title = args.get("title").and_then(Value::as_str).unwrap_or("");
                let body = args.get("body").and_then(Value::as_str).unwrap_or("");
                self.create_issue(title, body)
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}
