//! Inference provider port
//!
//! Defines the interface for producing an agent's candidate next message.
//! The provider is opaque: given the transcript context, the speaker's role
//! description, and the tools available to it, it returns content plus zero
//! or more tool requests, or fails with a timeout or provider error.

use async_trait::async_trait;
use standup_domain::{AgentId, Message};
use std::collections::HashMap;
use thiserror::Error;

use crate::ports::tool_runner::ToolDescriptor;

/// Errors that can occur during a provider call
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Provider timed out")]
    Timeout,

    #[error("Provider request failed: {0}")]
    Failed(String),
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout)
    }
}

/// A capability invocation the provider asks the agent to perform
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub name: String,
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.arguments.insert(key.into(), value);
        self
    }
}

/// Candidate reply produced by the provider for one turn
#[derive(Debug, Clone, Default)]
pub struct ProviderReply {
    pub content: String,
    pub tool_requests: Vec<ToolRequest>,
}

impl ProviderReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_requests: Vec::new(),
        }
    }

    pub fn with_tool_requests(mut self, tool_requests: Vec<ToolRequest>) -> Self {
        self.tool_requests = tool_requests;
        self
    }
}

/// Port for the inference provider.
///
/// Implementations (adapters) live in the infrastructure layer. The
/// orchestration layer enforces the per-turn timeout around this call, so
/// adapters may block for as long as their transport allows.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Produce the candidate next message for `speaker`'s turn.
    ///
    /// `messages` is the transcript context in causal order and
    /// `available_tools` the descriptors of the capabilities this speaker
    /// may request.
    async fn generate(
        &self,
        speaker: &AgentId,
        messages: &[Message],
        role_context: &str,
        available_tools: &[ToolDescriptor],
    ) -> Result<ProviderReply, ProviderError>;
}
