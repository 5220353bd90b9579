//! Tool runner port
//!
//! Defines the interface for invoking agent capabilities. The boundary is
//! infallible by contract: a tool that goes wrong produces a failed
//! [`ToolOutcome`], never an error the orchestration has to catch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use standup_domain::{AgentId, ToolOutcome};
use std::collections::HashMap;

/// Descriptor of an available capability, as offered to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Port for executing tools on behalf of an agent's turn
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Descriptors for every tool this runner offers
    fn descriptors(&self) -> Vec<ToolDescriptor>;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool;

    /// Invoke a tool on behalf of `caller`.
    ///
    /// Must never raise across the boundary: unknown names, bad arguments,
    /// and I/O failures all come back as failed outcomes.
    async fn invoke(
        &self,
        caller: &AgentId,
        name: &str,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> ToolOutcome;
}

/// Runner for rosters without tool users: offers nothing, fails everything
pub struct NoTools;

#[async_trait]
impl ToolRunner for NoTools {
    fn descriptors(&self) -> Vec<ToolDescriptor> {
        Vec::new()
    }

    fn has_tool(&self, _name: &str) -> bool {
        false
    }

    async fn invoke(
        &self,
        _caller: &AgentId,
        name: &str,
        _arguments: &HashMap<String, serde_json::Value>,
    ) -> ToolOutcome {
        ToolOutcome::failed(format!("unknown tool: {name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_tools_fails_without_raising() {
        let runner = NoTools;
        assert!(runner.descriptors().is_empty());
        assert!(!runner.has_tool("add_work_item"));
        let outcome = runner
            .invoke(&AgentId::new("po"), "add_work_item", &HashMap::new())
            .await;
        assert!(!outcome.is_ok());
        assert_eq!(outcome.error.as_deref(), Some("unknown tool: add_work_item"));
    }
}
