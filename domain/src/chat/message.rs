//! Messages and embedded tool invocations.
//!
//! A [`Message`] is one agent's contribution to a conversation. It is
//! immutable once appended to a [`Transcript`](crate::chat::Transcript).
//! Tool activity performed during the turn is embedded as
//! [`ToolInvocation`] records so a failing tool never aborts the turn
//! itself.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

/// Status of a single tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Ok,
    Failed,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Ok => "ok",
            ToolStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of invoking a capability, as returned across the tool boundary.
///
/// Failures are represented, never thrown: an invocation that goes wrong
/// yields `status: Failed` with an error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub status: ToolStatus,
    pub payload: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ToolOutcome {
    /// Successful invocation with a payload
    pub fn ok(payload: serde_json::Value) -> Self {
        Self {
            status: ToolStatus::Ok,
            payload: Some(payload),
            error: None,
        }
    }

    /// Failed invocation with an error message
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Failed,
            payload: None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ToolStatus::Ok
    }
}

/// One capability invocation performed during a turn, with its result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: HashMap<String, serde_json::Value>,
    pub status: ToolStatus,
    pub payload: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ToolInvocation {
    /// Build an invocation record from a requested call and its outcome
    pub fn from_outcome(
        name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
        outcome: ToolOutcome,
    ) -> Self {
        Self {
            name: name.into(),
            arguments,
            status: outcome.status,
            payload: outcome.payload,
            error: outcome.error,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == ToolStatus::Failed
    }
}

/// A message in a group conversation (Entity)
///
/// Owned by the transcript once appended; never mutated afterwards.
/// `sequence_number` is assigned from
/// [`Transcript::next_sequence`](crate::chat::Transcript::next_sequence)
/// before the append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub sender: AgentId,
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolInvocation>,
    pub timestamp: DateTime<Utc>,
    pub sequence_number: u64,
    /// True when this message stands in for a turn that was cancelled
    /// or timed out instead of producing real content.
    #[serde(default)]
    pub cancelled: bool,
}

impl Message {
    pub fn new(sender: AgentId, content: impl Into<String>, sequence_number: u64) -> Self {
        Self {
            sender,
            content: content.into(),
            tool_calls: Vec::new(),
            timestamp: Utc::now(),
            sequence_number,
            cancelled: false,
        }
    }

    /// A cancellation-marked message resolving a turn that was cut short
    pub fn cancellation(sender: AgentId, sequence_number: u64, reason: impl Into<String>) -> Self {
        Self {
            sender,
            content: reason.into(),
            tool_calls: Vec::new(),
            timestamp: Utc::now(),
            sequence_number,
            cancelled: true,
        }
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolInvocation>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    pub fn is_cancellation(&self) -> bool {
        self.cancelled
    }

    /// Case-insensitive marker containment check
    pub fn contains_marker(&self, marker: &str) -> bool {
        if marker.is_empty() {
            return false;
        }
        self.content
            .to_lowercase()
            .contains(&marker.to_lowercase())
    }
}
