//! Cross-session memory records.
//!
//! The core treats the memory backend as a capability behind a port; this
//! is the only shape it writes through it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

/// A durable fact an agent persists or retrieves across runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub namespace: String,
    pub key: String,
    pub value: serde_json::Value,
    pub agent_id: AgentId,
    pub written_at: DateTime<Utc>,
}

impl MemoryRecord {
    pub fn new(
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: serde_json::Value,
        agent_id: AgentId,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value,
            agent_id,
            written_at: Utc::now(),
        }
    }
}
