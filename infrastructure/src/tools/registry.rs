//! Tool registry
//!
//! The [`ToolRegistry`] implements [`ToolRunner`] over the builtin
//! capabilities: `add_work_item` for planning and the shared memory pair.
//! Routing failures (unknown names, bad arguments, a broken memory
//! backend) come back as failed outcomes, never as errors.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use standup_application::ports::memory_store::MemoryStore;
use standup_application::ports::tool_runner::{ToolDescriptor, ToolRunner};
use standup_domain::{AgentId, ToolOutcome, capabilities};

use super::builtin;

/// Registry of the builtin capabilities, backed by a memory store
pub struct ToolRegistry {
    memory: Arc<dyn MemoryStore>,
    namespace: String,
}

impl ToolRegistry {
    /// Build a registry writing memories under the given namespace
    /// (typically the project or sprint name).
    pub fn new(memory: Arc<dyn MemoryStore>, namespace: impl Into<String>) -> Self {
        Self {
            memory,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl ToolRunner for ToolRegistry {
    fn descriptors(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new(
                capabilities::ADD_WORK_ITEM,
                "Record a user story in the sprint backlog (description, optional priority and estimate)",
            ),
            ToolDescriptor::new(
                capabilities::MEMORY_PUT,
                "Persist a note under a key for later runs",
            ),
            ToolDescriptor::new(
                capabilities::MEMORY_GET,
                "Look up a previously persisted note by key",
            ),
        ]
    }

    fn has_tool(&self, name: &str) -> bool {
        matches!(
            name,
            capabilities::ADD_WORK_ITEM | capabilities::MEMORY_PUT | capabilities::MEMORY_GET
        )
    }

    async fn invoke(
        &self,
        caller: &AgentId,
        name: &str,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> ToolOutcome {
        match name {
            capabilities::ADD_WORK_ITEM => builtin::add_work_item(arguments),
            capabilities::MEMORY_PUT => {
                builtin::memory_put(self.memory.as_ref(), &self.namespace, caller, arguments).await
            }
            capabilities::MEMORY_GET => {
                builtin::memory_get(self.memory.as_ref(), &self.namespace, arguments).await
            }
            _ => ToolOutcome::failed(format!("unknown tool: {name}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use serde_json::Value;

    fn registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(InMemoryStore::new()), "test-project")
    }

    fn args(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_descriptors_cover_builtins() {
        let registry = registry();
        let names: Vec<String> = registry
            .descriptors()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["add_work_item", "memory_put", "memory_get"]);
        assert!(registry.has_tool("memory_put"));
        assert!(!registry.has_tool("launch_missiles"));
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_without_raising() {
        let outcome = registry()
            .invoke(&AgentId::new("dev"), "launch_missiles", &HashMap::new())
            .await;
        assert!(!outcome.is_ok());
        assert_eq!(outcome.error.as_deref(), Some("unknown tool: launch_missiles"));
    }

    #[tokio::test]
    async fn test_memory_round_trip_through_registry() {
        let registry = registry();
        let caller = AgentId::new("senior_developer");

        let put = registry
            .invoke(
                &caller,
                "memory_put",
                &args(&[
                    ("key", Value::from("architecture")),
                    ("value", serde_json::json!({"db": "postgres"})),
                ]),
            )
            .await;
        assert!(put.is_ok());

        let get = registry
            .invoke(
                &caller,
                "memory_get",
                &args(&[("key", Value::from("architecture"))]),
            )
            .await;
        let payload = get.payload.unwrap();
        assert_eq!(payload["found"], true);
        assert_eq!(payload["value"], serde_json::json!({"db": "postgres"}));
    }

    #[tokio::test]
    async fn test_memory_get_missing_key_is_found_false() {
        let outcome = registry()
            .invoke(
                &AgentId::new("dev"),
                "memory_get",
                &args(&[("key", Value::from("nothing"))]),
            )
            .await;
        assert!(outcome.is_ok());
        assert_eq!(outcome.payload.unwrap()["found"], false);
    }

    #[tokio::test]
    async fn test_add_work_item_via_registry() {
        let outcome = registry()
            .invoke(
                &AgentId::new("product_owner"),
                "add_work_item",
                &args(&[("description", Value::from("login page"))]),
            )
            .await;
        assert!(outcome.is_ok());
        assert_eq!(outcome.payload.unwrap()["description"], "login page");
    }
}
