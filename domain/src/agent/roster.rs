//! The roster: agents registered for one orchestration run.
//!
//! Registration order is significant (round-robin and fallback selection
//! follow it) and ids must be unique. The roster is read-only once the
//! orchestrator leaves `INIT`.

use crate::agent::entities::{Agent, AgentId};
use crate::core::error::DomainError;

/// Registration-ordered agent set for one conversation
#[derive(Debug, Clone, Default)]
pub struct Roster {
    agents: Vec<Agent>,
}

impl Roster {
    pub fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Register an agent, rejecting duplicate ids
    pub fn register(&mut self, agent: Agent) -> Result<(), DomainError> {
        if self.contains(agent.id()) {
            return Err(DomainError::DuplicateAgent(agent.id().to_string()));
        }
        self.agents.push(agent);
        Ok(())
    }

    /// Build a roster from agents in registration order
    pub fn from_agents(agents: Vec<Agent>) -> Result<Self, DomainError> {
        let mut roster = Self::new();
        for agent in agents {
            roster.register(agent)?;
        }
        Ok(roster)
    }

    pub fn get(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.get(id).is_some()
    }

    /// Index of an agent in registration order
    pub fn position(&self, id: &AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id() == id)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn ids(&self) -> Vec<&AgentId> {
        self.agents.iter().map(|a| a.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
