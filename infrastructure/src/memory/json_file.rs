//! File-backed memory store.
//!
//! Persists every record as a JSON array so notes survive across sprints
//! and process restarts. The whole file is rewritten on each put; the
//! store is meant for small per-project memories, not bulk data.

use async_trait::async_trait;
use standup_application::ports::memory_store::{MemoryError, MemoryStore};
use standup_domain::MemoryRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// [`MemoryStore`] backed by a single JSON file
pub struct JsonFileStore {
    path: PathBuf,
    records: RwLock<HashMap<(String, String), MemoryRecord>>,
}

impl JsonFileStore {
    /// Open a store, loading any records the file already holds.
    ///
    /// A missing file is an empty store; it is created on first put.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref().to_path_buf();
        let mut records = HashMap::new();
        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| MemoryError::Backend(format!("read {}: {e}", path.display())))?;
            let loaded: Vec<MemoryRecord> = serde_json::from_str(&content)
                .map_err(|e| MemoryError::Backend(format!("parse {}: {e}", path.display())))?;
            for record in loaded {
                records.insert((record.namespace.clone(), record.key.clone()), record);
            }
        }
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &HashMap<(String, String), MemoryRecord>) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MemoryError::Backend(format!("mkdir {}: {e}", parent.display())))?;
        }
        let mut all: Vec<&MemoryRecord> = records.values().collect();
        // Stable file content for identical stores
        all.sort_by(|a, b| (&a.namespace, &a.key).cmp(&(&b.namespace, &b.key)));
        let json = serde_json::to_string_pretty(&all)
            .map_err(|e| MemoryError::Backend(format!("serialize: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| MemoryError::Backend(format!("write {}: {e}", self.path.display())))
    }
}

#[async_trait]
impl MemoryStore for JsonFileStore {
    async fn put(&self, record: MemoryRecord) -> Result<(), MemoryError> {
        let mut records = self.records.write().await;
        records.insert((record.namespace.clone(), record.key.clone()), record);
        self.persist(&records)
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Option<MemoryRecord>, MemoryError> {
        let records = self.records.read().await;
        Ok(records
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }
}
