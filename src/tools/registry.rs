//! Registry mapping tool names to their owning adapters.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::tools::types::{ToolAdapter, ToolDescriptor, ToolError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate tool name '{name}' registered by more than one adapter")]
    DuplicateTool { name: String },
}

/// Explicitly constructed set of tool adapters.
///
/// Adapters are passed in at startup; nothing is discovered at runtime.
/// Construction fails when two adapters expose the same tool name, so a
/// misconfigured deployment dies before it serves a single invocation.
pub struct ToolRegistry {
    adapters: Vec<Arc<dyn ToolAdapter>>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl ToolRegistry {
    pub fn new(adapters: Vec<Arc<dyn ToolAdapter>>) -> Result<Self, RegistryError> {
        let mut index = HashMap::new();
        for (slot, adapter) in adapters.iter().enumerate() {
            for descriptor in adapter.descriptors() {
                if index.insert(descriptor.name.clone(), slot).is_some() {
                    return Err(RegistryError::DuplicateTool {
                        name: descriptor.name,
                    });
                }
            }
        }
        info!(tools = index.len(), "tool registry built");
        Ok(Self { adapters, index })
    }

    /// All registered tool descriptors, in adapter registration order.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.adapters
            .iter()
            .flat_map(|adapter| adapter.descriptors())
            .collect()
    }

    pub fn adapters(&self) -> &[Arc<dyn ToolAdapter>] {
        &self.adapters
    }

    /// Route an invocation to the adapter that owns `name`.
    pub fn invoke(
        &self,
        name: &str,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<String, ToolError> {
        let slot = self
            .index
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        self.adapters[*slot].invoke(name, args)
    }
}
