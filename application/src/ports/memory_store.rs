//! Key-value memory port.
//!
//! Agents with the memory capabilities persist notes across turns and
//! sprints through this interface. Lookups distinguish "not found"
//! (`Ok(None)`) from a broken backend (`Err`).

use async_trait::async_trait;
use standup_domain::MemoryRecord;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum MemoryError {
    #[error("Memory backend failed: {0}")]
    Backend(String),
}

/// Port for the shared agent memory
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Store a record, replacing any previous value under the same
    /// namespace and key.
    async fn put(&self, record: MemoryRecord) -> Result<(), MemoryError>;

    /// Fetch a record. A missing key is `Ok(None)`, not an error.
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<MemoryRecord>, MemoryError>;
}
