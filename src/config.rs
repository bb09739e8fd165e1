//! Environment-driven bridge configuration and wiring.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::mcp::transport::{HttpTransport, TransportConfig, TransportError};
use crate::mcp::McpClient;
use crate::tools::registry::{RegistryError, ToolRegistry};
use crate::tools::types::FailurePolicy;
use crate::tools::GitHubIssuesAdapter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Everything needed to stand up the bridge: where the MCP endpoint lives,
/// which repository the issue tools are bound to, and how failures surface.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub owner: String,
    pub repo: String,
    pub timeout_secs: u64,
    pub failure_policy: FailurePolicy,
}

impl BridgeConfig {
    /// Load configuration from the environment, reading `.env` first if present.
    ///
    /// Required: `MCP_ENDPOINT`, `GITHUB_OWNER`, `GITHUB_REPO`.
    /// Optional: `GITHUB_TOKEN`, `BRIDGE_TIMEOUT_SECS` (default 30),
    /// `BRIDGE_ESCALATE_TOOL_ERRORS` (default false).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let endpoint = require("MCP_ENDPOINT")?;
        let owner = require("GITHUB_OWNER")?;
        let repo = require("GITHUB_REPO")?;
        let token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());

        let timeout_secs = match env::var("BRIDGE_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: "BRIDGE_TIMEOUT_SECS",
                message: format!("expected a number of seconds, got '{}'", raw),
            })?,
            Err(_) => 30,
        };

        let failure_policy = match env::var("BRIDGE_ESCALATE_TOOL_ERRORS").as_deref() {
            Ok("1") | Ok("true") => FailurePolicy::Escalate,
            _ => FailurePolicy::Report,
        };

        let config = Self {
            endpoint,
            token,
            owner,
            repo,
            timeout_secs,
            failure_policy,
        };
        config.validate()?;
        debug!(endpoint = %config.endpoint, owner = %config.owner, repo = %config.repo, "bridge config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidVar {
                var: "MCP_ENDPOINT",
                message: format!("expected an http(s) URL, got '{}'", self.endpoint),
            });
        }
        if self.owner.trim().is_empty() {
            return Err(ConfigError::InvalidVar {
                var: "GITHUB_OWNER",
                message: "must not be blank".to_string(),
            });
        }
        if self.repo.trim().is_empty() {
            return Err(ConfigError::InvalidVar {
                var: "GITHUB_REPO",
                message: "must not be blank".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidVar {
                var: "BRIDGE_TIMEOUT_SECS",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Build the protocol client for this endpoint.
    pub fn build_client(&self) -> Result<Arc<McpClient>, ConfigError> {
        let mut transport_config =
            TransportConfig::default().with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(token) = &self.token {
            transport_config = transport_config.with_token(token.clone());
        }
        let transport = HttpTransport::new(&self.endpoint, transport_config)?;
        Ok(Arc::new(McpClient::new(Arc::new(transport))))
    }

    /// Wire the full registry: client, issue adapter, registry.
    pub fn build_registry(&self) -> Result<ToolRegistry, ConfigError> {
        let client = self.build_client()?;
        let adapter = GitHubIssuesAdapter::new(client, self.owner.clone(), self.repo.clone())
            .with_policy(self.failure_policy);
        Ok(ToolRegistry::new(vec![Arc::new(adapter)])?)
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(var))
}
