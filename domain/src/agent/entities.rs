//! Agent entities - role-bound conversation participants.
//!
//! An [`Agent`] produces one message per turn. Its response mechanism is a
//! tagged [`AgentBehavior`] variant rather than a class hierarchy: plain
//! responders, tool-executing responders (carrying their capability
//! bindings), and human proxies (carrying their suspension timeout). Agents
//! are assembled at team-creation time and immutable afterwards.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chat::message::Message;

/// Unique, stable agent name within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for AgentId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// When an agent's turns defer to a human
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumanInputMode {
    /// Fully automated, never consults a human
    #[default]
    Never,
    /// Consulted once a termination condition fires, before the run is
    /// finalized; a reply keeps the conversation going
    OnTermination,
    /// Every turn of this agent requests human input
    Always,
}

impl HumanInputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HumanInputMode::Never => "never",
            HumanInputMode::OnTermination => "on_termination",
            HumanInputMode::Always => "always",
        }
    }
}

impl std::fmt::Display for HumanInputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HumanInputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(HumanInputMode::Never),
            "on_termination" => Ok(HumanInputMode::OnTermination),
            "always" => Ok(HumanInputMode::Always),
            other => Err(format!("unknown human input mode: {other}")),
        }
    }
}

/// Predicate an agent may carry to declare the conversation finished
pub type TerminationPredicate = Arc<dyn Fn(&Message) -> bool + Send + Sync>;

/// Response mechanism of an agent.
///
/// Each variant embeds only the state it needs: capability bindings for
/// tool users, the suspension timeout for human proxies.
#[derive(Debug, Clone)]
pub enum AgentBehavior {
    /// Plain responder: the provider's reply becomes the message
    Responder,
    /// Responder that may invoke the named capabilities during its turn
    ToolUser { capabilities: BTreeSet<String> },
    /// Suspends for external input; `None` falls back to the turn timeout
    HumanProxy { input_timeout: Option<Duration> },
}

impl AgentBehavior {
    pub fn kind(&self) -> &'static str {
        match self {
            AgentBehavior::Responder => "responder",
            AgentBehavior::ToolUser { .. } => "tool_user",
            AgentBehavior::HumanProxy { .. } => "human_proxy",
        }
    }
}

/// A role-bound conversation participant (Entity)
#[derive(Clone)]
pub struct Agent {
    id: AgentId,
    role_description: String,
    behavior: AgentBehavior,
    termination_predicate: Option<TerminationPredicate>,
    human_input_mode: HumanInputMode,
}

impl Agent {
    /// Plain responder agent
    pub fn responder(id: impl Into<AgentId>, role_description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role_description: role_description.into(),
            behavior: AgentBehavior::Responder,
            termination_predicate: None,
            human_input_mode: HumanInputMode::Never,
        }
    }

    /// Tool-executing responder bound to the given capability names
    pub fn tool_user<I, S>(
        id: impl Into<AgentId>,
        role_description: impl Into<String>,
        capabilities: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            role_description: role_description.into(),
            behavior: AgentBehavior::ToolUser {
                capabilities: capabilities.into_iter().map(Into::into).collect(),
            },
            termination_predicate: None,
            human_input_mode: HumanInputMode::Never,
        }
    }

    /// Human-proxy agent whose turns suspend for external input
    pub fn human_proxy(id: impl Into<AgentId>, role_description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role_description: role_description.into(),
            behavior: AgentBehavior::HumanProxy {
                input_timeout: None,
            },
            termination_predicate: None,
            human_input_mode: HumanInputMode::Always,
        }
    }

    pub fn with_human_input_mode(mut self, mode: HumanInputMode) -> Self {
        self.human_input_mode = mode;
        self
    }

    /// Set the suspension timeout for a human proxy. No effect on other
    /// behaviors.
    pub fn with_input_timeout(mut self, timeout: Duration) -> Self {
        if let AgentBehavior::HumanProxy { input_timeout } = &mut self.behavior {
            *input_timeout = Some(timeout);
        }
        self
    }

    pub fn with_termination_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        self.termination_predicate = Some(Arc::new(predicate));
        self
    }

    /// Convenience: declare termination when the agent's own message
    /// contains the given marker.
    pub fn declaring_completion_on(self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        self.with_termination_predicate(move |message| message.contains_marker(&marker))
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn role_description(&self) -> &str {
        &self.role_description
    }

    pub fn behavior(&self) -> &AgentBehavior {
        &self.behavior
    }

    pub fn human_input_mode(&self) -> HumanInputMode {
        self.human_input_mode
    }

    pub fn is_human_proxy(&self) -> bool {
        matches!(self.behavior, AgentBehavior::HumanProxy { .. })
    }

    /// Capability names this agent may invoke; empty unless a tool user
    pub fn capabilities(&self) -> Vec<&str> {
        match &self.behavior {
            AgentBehavior::ToolUser { capabilities } => {
                capabilities.iter().map(String::as_str).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn has_capability(&self, name: &str) -> bool {
        match &self.behavior {
            AgentBehavior::ToolUser { capabilities } => capabilities.contains(name),
            _ => false,
        }
    }

    /// Suspension timeout for a human proxy, if one is configured
    pub fn input_timeout(&self) -> Option<Duration> {
        match &self.behavior {
            AgentBehavior::HumanProxy { input_timeout } => *input_timeout,
            _ => None,
        }
    }

    /// Evaluate the agent's own termination predicate against a message
    pub fn declares_termination(&self, message: &Message) -> bool {
        match &self.termination_predicate {
            Some(predicate) => predicate(message),
            None => false,
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("behavior", &self.behavior)
            .field("human_input_mode", &self.human_input_mode)
            .field("has_termination_predicate", &self.termination_predicate.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responder_has_no_capabilities() {
        let agent = Agent::responder("qa", "quality engineer");
        assert!(agent.capabilities().is_empty());
        assert!(!agent.has_capability("memory_put"));
        assert_eq!(agent.human_input_mode(), HumanInputMode::Never);
    }

    #[test]
    fn test_tool_user_capabilities_are_sorted_and_deduplicated() {
        let agent = Agent::tool_user("po", "product owner", ["add_work_item", "add_work_item"]);
        assert_eq!(agent.capabilities(), vec!["add_work_item"]);
        assert!(agent.has_capability("add_work_item"));
    }

    #[test]
    fn test_human_proxy_defaults_to_always() {
        let agent = Agent::human_proxy("user", "human in the loop")
            .with_input_timeout(Duration::from_secs(30));
        assert!(agent.is_human_proxy());
        assert_eq!(agent.human_input_mode(), HumanInputMode::Always);
        assert_eq!(agent.input_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_termination_predicate_fires_on_own_marker() {
        let agent = Agent::responder("scrum_master", "facilitator")
            .declaring_completion_on("SPRINT_COMPLETE!");
        let done = Message::new(AgentId::new("scrum_master"), "all done, sprint_complete!", 0);
        let not_done = Message::new(AgentId::new("scrum_master"), "still working", 1);
        assert!(agent.declares_termination(&done));
        assert!(!agent.declares_termination(&not_done));
    }

    #[test]
    fn test_human_input_mode_round_trip() {
        for mode in [
            HumanInputMode::Never,
            HumanInputMode::OnTermination,
            HumanInputMode::Always,
        ] {
            let parsed: HumanInputMode = mode.as_str().parse().unwrap();
            assert_eq!(parsed, mode);
        }
        assert!("sometimes".parse::<HumanInputMode>().is_err());
    }
}
