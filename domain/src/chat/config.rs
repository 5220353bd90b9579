//! Per-run conversation configuration.
//!
//! Binds a selection pattern to the explicit initial speaker, an optional
//! final (user-proxy) agent, and the termination policy. Immutable for the
//! duration of a run; validated once at orchestration start.

use crate::agent::{AgentId, Roster};
use crate::core::error::DomainError;
use crate::selection::GroupChatPattern;
use crate::termination::TerminationPolicy;

/// Configuration for one orchestration run
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pattern: GroupChatPattern,
    initial_speaker: AgentId,
    final_agent: Option<AgentId>,
    policy: TerminationPolicy,
}

impl ChatConfig {
    pub fn new(
        pattern: GroupChatPattern,
        initial_speaker: impl Into<AgentId>,
        policy: TerminationPolicy,
    ) -> Self {
        Self {
            pattern,
            initial_speaker: initial_speaker.into(),
            final_agent: None,
            policy,
        }
    }

    /// Designate the final/user-proxy agent consulted on termination
    pub fn with_final_agent(mut self, agent: impl Into<AgentId>) -> Self {
        self.final_agent = Some(agent.into());
        self
    }

    pub fn pattern(&self) -> &GroupChatPattern {
        &self.pattern
    }

    pub fn initial_speaker(&self) -> &AgentId {
        &self.initial_speaker
    }

    pub fn final_agent(&self) -> Option<&AgentId> {
        self.final_agent.as_ref()
    }

    pub fn policy(&self) -> &TerminationPolicy {
        &self.policy
    }

    /// Validate against a roster, as the orchestrator does at `INIT`.
    ///
    /// Checks: roster non-empty, initial and final agents registered,
    /// sequential lists non-empty and fully registered, and the
    /// termination policy bounded (no conversation may run without either
    /// a content marker or a round budget).
    pub fn validate(&self, roster: &Roster) -> Result<(), DomainError> {
        if roster.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        if !roster.contains(&self.initial_speaker) {
            return Err(DomainError::UnknownAgent(self.initial_speaker.to_string()));
        }
        if let Some(agent) = &self.final_agent
            && !roster.contains(agent)
        {
            return Err(DomainError::UnknownAgent(agent.to_string()));
        }
        if let GroupChatPattern::Sequential(order) = &self.pattern {
            if order.is_empty() {
                return Err(DomainError::NoEligibleSpeaker);
            }
            for id in order {
                if !roster.contains(id) {
                    return Err(DomainError::UnknownAgent(id.to_string()));
                }
            }
        }
        self.policy.validate()
    }
}
