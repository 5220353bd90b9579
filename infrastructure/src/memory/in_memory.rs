//! Process-local memory store.

use async_trait::async_trait;
use standup_application::ports::memory_store::{MemoryError, MemoryStore};
use standup_domain::MemoryRecord;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process [`MemoryStore`] keyed by `(namespace, key)`.
///
/// The default backend for single runs; nothing survives the process.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<(String, String), MemoryRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn put(&self, record: MemoryRecord) -> Result<(), MemoryError> {
        let key = (record.namespace.clone(), record.key.clone());
        self.records.write().await.insert(key, record);
        Ok(())
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Option<MemoryRecord>, MemoryError> {
        let records = self.records.read().await;
        Ok(records
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use standup_domain::AgentId;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryStore::new();
        let record = MemoryRecord::new(
            "sprint-1",
            "architecture",
            serde_json::json!({"db": "postgres"}),
            AgentId::new("senior_developer"),
        );
        store.put(record.clone()).await.unwrap();

        let found = store.get("sprint-1", "architecture").await.unwrap();
        assert_eq!(found, Some(record));
    }

    #[tokio::test]
    async fn test_missing_key_is_none_not_error() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("sprint-1", "nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_replaces_existing_value() {
        let store = InMemoryStore::new();
        let agent = AgentId::new("qa_engineer");
        store
            .put(MemoryRecord::new("s", "k", serde_json::json!(1), agent.clone()))
            .await
            .unwrap();
        store
            .put(MemoryRecord::new("s", "k", serde_json::json!(2), agent))
            .await
            .unwrap();
        let found = store.get("s", "k").await.unwrap().unwrap();
        assert_eq!(found.value, serde_json::json!(2));
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = InMemoryStore::new();
        store
            .put(MemoryRecord::new(
                "sprint-1",
                "k",
                serde_json::json!("a"),
                AgentId::new("dev"),
            ))
            .await
            .unwrap();
        assert_eq!(store.get("sprint-2", "k").await.unwrap(), None);
    }
}
