//! Builtin capability implementations.
//!
//! Each builtin takes the raw argument map and produces a [`ToolOutcome`];
//! argument problems come back as failed outcomes with a message the
//! conversation can see, never as errors.

use serde_json::Value;
use standup_application::ports::memory_store::MemoryStore;
use standup_domain::{AgentId, MemoryRecord, ToolOutcome};
use std::collections::HashMap;

const DEFAULT_PRIORITY: u8 = 3;
const DEFAULT_ESTIMATE: u32 = 3;

/// Record a work item for the planning scan.
///
/// The outcome payload is the normalized item: description plus priority
/// and estimate with defaults applied. The sprint controller reads items
/// from these payloads, so the shape is part of the planning contract.
pub(crate) fn add_work_item(arguments: &HashMap<String, Value>) -> ToolOutcome {
    let description = match arguments.get("description").and_then(Value::as_str) {
        Some(d) if !d.trim().is_empty() => d.trim().to_string(),
        Some(_) => return ToolOutcome::failed("description must not be empty"),
        None => return ToolOutcome::failed("missing required argument: description"),
    };
    let priority = match optional_u64(arguments, "priority") {
        Ok(value) => value.unwrap_or(DEFAULT_PRIORITY as u64),
        Err(outcome) => return outcome,
    };
    if priority > u8::MAX as u64 {
        return ToolOutcome::failed("priority out of range");
    }
    let estimate = match optional_u64(arguments, "estimate") {
        Ok(value) => value.unwrap_or(DEFAULT_ESTIMATE as u64),
        Err(outcome) => return outcome,
    };

    ToolOutcome::ok(serde_json::json!({
        "description": description,
        "priority": priority,
        "estimate": estimate,
    }))
}

/// Persist a note under the run's namespace
pub(crate) async fn memory_put(
    store: &dyn MemoryStore,
    namespace: &str,
    caller: &AgentId,
    arguments: &HashMap<String, Value>,
) -> ToolOutcome {
    let Some(key) = arguments.get("key").and_then(Value::as_str) else {
        return ToolOutcome::failed("missing required argument: key");
    };
    let Some(value) = arguments.get("value") else {
        return ToolOutcome::failed("missing required argument: value");
    };

    let record = MemoryRecord::new(namespace, key, value.clone(), caller.clone());
    match store.put(record).await {
        Ok(()) => ToolOutcome::ok(serde_json::json!({ "stored": true, "key": key })),
        Err(e) => ToolOutcome::failed(e.to_string()),
    }
}

/// Look up a note. A missing key is a successful lookup with `found: false`.
pub(crate) async fn memory_get(
    store: &dyn MemoryStore,
    namespace: &str,
    arguments: &HashMap<String, Value>,
) -> ToolOutcome {
    let Some(key) = arguments.get("key").and_then(Value::as_str) else {
        return ToolOutcome::failed("missing required argument: key");
    };

    match store.get(namespace, key).await {
        Ok(Some(record)) => ToolOutcome::ok(serde_json::json!({
            "found": true,
            "key": key,
            "value": record.value,
        })),
        Ok(None) => ToolOutcome::ok(serde_json::json!({ "found": false, "key": key })),
        Err(e) => ToolOutcome::failed(e.to_string()),
    }
}

fn optional_u64(
    arguments: &HashMap<String, Value>,
    name: &str,
) -> Result<Option<u64>, ToolOutcome> {
    match arguments.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| ToolOutcome::failed(format!("{name} must be a non-negative integer"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_add_work_item_normalizes_payload() {
        let outcome = add_work_item(&args(&[
            ("description", Value::from("login page")),
            ("priority", Value::from(1)),
            ("estimate", Value::from(5)),
        ]));
        assert!(outcome.is_ok());
        assert_eq!(
            outcome.payload.unwrap(),
            serde_json::json!({"description": "login page", "priority": 1, "estimate": 5})
        );
    }

    #[test]
    fn test_add_work_item_applies_defaults() {
        let outcome = add_work_item(&args(&[("description", Value::from("cleanup"))]));
        let payload = outcome.payload.unwrap();
        assert_eq!(payload["priority"], 3);
        assert_eq!(payload["estimate"], 3);
    }

    #[test]
    fn test_add_work_item_requires_description() {
        assert!(!add_work_item(&args(&[])).is_ok());
        assert!(!add_work_item(&args(&[("description", Value::from("  "))])).is_ok());
    }

    #[test]
    fn test_add_work_item_rejects_non_integer_priority() {
        let outcome = add_work_item(&args(&[
            ("description", Value::from("x")),
            ("priority", Value::from("high")),
        ]));
        assert!(!outcome.is_ok());
        assert!(outcome.error.unwrap().contains("priority"));
    }
}
