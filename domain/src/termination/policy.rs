//! Termination policy and detection.
//!
//! [`TerminationPolicy::should_stop`] is a pure function of its inputs,
//! evaluated after every append in a fixed order: external cancel, round
//! budget, content marker, then the sender's own predicate. First match
//! wins. A policy with neither a marker nor a round budget would never
//! stop a fully automated conversation; that is rejected as
//! [`DomainError::UnboundedConversation`] before a run starts.

use crate::agent::Agent;
use crate::chat::message::Message;
use crate::core::error::DomainError;
use crate::termination::stop::StopReason;

/// Default completion marker scanned for in messages
pub const DEFAULT_COMPLETION_MARKER: &str = "SPRINT_COMPLETE!";

/// Bounded termination rules for one conversation
#[derive(Debug, Clone, Default)]
pub struct TerminationPolicy {
    marker: Option<String>,
    max_rounds: Option<u32>,
}

impl TerminationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop once a message contains this marker (case-insensitive)
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Stop once this many rounds have been appended
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    pub fn max_rounds(&self) -> Option<u32> {
        self.max_rounds
    }

    /// Reject unbounded or degenerate policies
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_rounds == Some(0) {
            return Err(DomainError::InvalidMaxRounds);
        }
        if self.marker.is_none() && self.max_rounds.is_none() {
            return Err(DomainError::UnboundedConversation);
        }
        Ok(())
    }

    /// Evaluate the termination rules after an append.
    ///
    /// `latest` is the most recent message and `sender` the agent that
    /// produced it (for its own termination predicate). Pure and
    /// idempotent: identical inputs yield identical results.
    pub fn should_stop(
        &self,
        cancelled: bool,
        round_count: u32,
        latest: Option<&Message>,
        sender: Option<&Agent>,
    ) -> Option<StopReason> {
        if cancelled {
            return Some(StopReason::ExternalCancel);
        }
        if let Some(limit) = self.max_rounds
            && round_count >= limit
        {
            return Some(StopReason::MaxRounds { limit });
        }
        if let (Some(marker), Some(message)) = (&self.marker, latest)
            && message.contains_marker(marker)
        {
            return Some(StopReason::ContentMarker {
                marker: marker.clone(),
                sequence_number: message.sequence_number,
            });
        }
        if let (Some(message), Some(agent)) = (latest, sender)
            && agent.declares_termination(message)
        {
            return Some(StopReason::AgentDeclared {
                agent: agent.id().clone(),
            });
        }
        None
    }
}
