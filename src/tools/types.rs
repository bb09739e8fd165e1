//! Shared types and traits for the tool system.
//!
//! This module defines the core abstractions for tools:
//! - Descriptor types the agent runtime presents to the model
//! - The `ToolAdapter` trait for implementing capability groups
//! - Error types and the failure escalation policy

use serde::{Deserialize, Serialize};

/// Primitive type of a tool parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Number,
    Bool,
}

impl ParamType {
    /// JSON Schema type name for this parameter type.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Bool => "boolean",
        }
    }
}

/// One declared parameter of a tool operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParam {
    pub name: String,
    pub param_type: ParamType,
    pub required: bool,
    pub description: String,
}

impl ToolParam {
    /// Create a required parameter.
    pub fn required(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            description: description.into(),
        }
    }
}

/// Descriptor for a single tool operation.
///
/// Created once at adapter construction and never mutated afterwards; the
/// agent runtime hands it to the model's tool-selection mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// Parameters in declaration order.
    pub params: Vec<ToolParam>,
}

impl ToolDescriptor {
    /// Render the parameter list as a JSON Schema object.
    pub fn input_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        for param in &self.params {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": param.param_type.json_type(),
                    "description": param.description,
                }),
            );
        }

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Errors that can occur during tool execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("execution failed: {0}")]
    Execution(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

/// What an adapter does with a failed tool call.
///
/// `Report` converts every failure into a legible failure string so the
/// model's reasoning loop keeps running; `Escalate` surfaces the underlying
/// `ToolError` to the host instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    #[default]
    Report,
    Escalate,
}

/// Trait for implementing tool capability groups.
///
/// Adapters declare a fixed set of operations and bridge each into a remote
/// call. `invoke` blocks the calling thread until the remote call completes;
/// the agent runtime's call convention expects a synchronous string return.
/// Implementations must be safe for concurrent invocation.
pub trait ToolAdapter: Send + Sync {
    /// Descriptors for every operation this adapter declares.
    fn descriptors(&self) -> Vec<ToolDescriptor>;

    /// Invoke a declared operation by name with map-valued arguments.
    ///
    /// Under `FailurePolicy::Report` the `Ok` string carries both success and
    /// failure outcomes, textually distinguishable; `Err` is reserved for the
    /// escalation policy and routing bugs.
    fn invoke(
        &self,
        name: &str,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<String, ToolError>;
}
