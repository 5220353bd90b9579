//! Team assembly.
//!
//! A [`Team`] is the explicit configuration object handed to the
//! orchestration layer: roster, pattern, speaking bounds, and sprint
//! tuning. There is no process-wide registry; presets build a fresh value
//! every time.

pub mod roles;

use crate::agent::{Agent, AgentId, Roster};
use crate::chat::ChatConfig;
use crate::core::error::DomainError;
use crate::selection::GroupChatPattern;
use crate::sprint::SprintConfig;
use crate::termination::TerminationPolicy;

/// A named roster plus the run configuration it was assembled for
#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    pub roster: Roster,
    pub pattern: GroupChatPattern,
    pub initial_speaker: AgentId,
    pub final_agent: Option<AgentId>,
    pub sprint: SprintConfig,
}

impl Team {
    /// Assemble a team, validating id uniqueness and sprint tuning
    pub fn assemble(
        name: impl Into<String>,
        agents: Vec<Agent>,
        pattern: GroupChatPattern,
        initial_speaker: impl Into<AgentId>,
        final_agent: Option<AgentId>,
        sprint: SprintConfig,
    ) -> Result<Self, DomainError> {
        sprint.validate()?;
        Ok(Self {
            name: name.into(),
            roster: Roster::from_agents(agents)?,
            pattern,
            initial_speaker: initial_speaker.into(),
            final_agent,
            sprint,
        })
    }

    /// Standard agile team: six roles, round robin from the product
    /// owner, on top of the given sprint tuning
    pub fn agile(sprint: SprintConfig) -> Result<Self, DomainError> {
        Self::assemble(
            "agile",
            roles::standard_roster(&sprint.completion_marker),
            GroupChatPattern::RoundRobin,
            roles::PRODUCT_OWNER,
            Some(AgentId::new(roles::SCRUM_MASTER)),
            sprint,
        )
    }

    /// Self-improving variant: shorter cycles, smaller commitments, more
    /// iterations. The tuning overrides whatever the given base sets for
    /// those three knobs.
    pub fn self_improving(sprint: SprintConfig) -> Result<Self, DomainError> {
        let sprint = sprint
            .with_duration_days(7)
            .with_capacity_points(30)
            .with_max_iterations(15);
        Self::assemble(
            "self-improving",
            roles::standard_roster(&sprint.completion_marker),
            GroupChatPattern::RoundRobin,
            roles::PRODUCT_OWNER,
            Some(AgentId::new(roles::SCRUM_MASTER)),
            sprint,
        )
    }

    /// Chat configuration for one run of this team under the given policy
    pub fn chat_config(&self, policy: TerminationPolicy) -> ChatConfig {
        let mut config = ChatConfig::new(
            self.pattern.clone(),
            self.initial_speaker.clone(),
            policy,
        );
        if let Some(agent) = &self.final_agent {
            config = config.with_final_agent(agent.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agile_preset_is_valid() {
        let team = Team::agile(SprintConfig::default()).unwrap();
        assert_eq!(team.roster.len(), 6);
        assert_eq!(team.initial_speaker.as_str(), roles::PRODUCT_OWNER);
        assert_eq!(team.sprint.capacity_points, 40);
        let config = team.chat_config(TerminationPolicy::new().with_max_rounds(4));
        assert!(config.validate(&team.roster).is_ok());
        assert_eq!(
            config.final_agent().map(|a| a.as_str()),
            Some(roles::SCRUM_MASTER)
        );
    }

    #[test]
    fn test_self_improving_preset_tuning() {
        let team = Team::self_improving(SprintConfig::default()).unwrap();
        assert_eq!(team.sprint.duration_days, 7);
        assert_eq!(team.sprint.capacity_points, 30);
        assert_eq!(team.sprint.max_iterations, 15);
    }

    #[test]
    fn test_agile_preset_keeps_configured_base() {
        let base = SprintConfig::default().with_capacity_points(25);
        let team = Team::agile(base).unwrap();
        assert_eq!(team.sprint.capacity_points, 25);
    }

    #[test]
    fn test_self_improving_tuning_overrides_configured_base() {
        let base = SprintConfig::default()
            .with_capacity_points(99)
            .with_max_iterations(2);
        let team = Team::self_improving(base).unwrap();
        assert_eq!(team.sprint.capacity_points, 30);
        assert_eq!(team.sprint.max_iterations, 15);
    }

    #[test]
    fn test_assemble_rejects_duplicate_ids() {
        let err = Team::assemble(
            "broken",
            vec![
                Agent::responder("dev", "developer"),
                Agent::responder("dev", "other"),
            ],
            GroupChatPattern::RoundRobin,
            "dev",
            None,
            SprintConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, DomainError::DuplicateAgent("dev".to_string()));
    }
}
