//! Deterministic offline provider.
//!
//! [`ScriptedProvider`] replays canned replies instead of calling a real
//! inference backend: each agent has a queue of scripted replies consumed
//! in order, then a fallback line. Runs stay fully offline and
//! reproducible, which is what the demo mode and most tests want.

use async_trait::async_trait;
use standup_application::ports::inference::{
    InferenceProvider, ProviderError, ProviderReply, ToolRequest,
};
use standup_application::ports::speaker_chooser::SpeakerChooser;
use standup_application::ports::tool_runner::ToolDescriptor;
use standup_domain::team::roles;
use standup_domain::{AgentId, Message, Roster, Transcript, capabilities};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Inference provider that replays scripted replies
pub struct ScriptedProvider {
    scripts: Mutex<HashMap<String, VecDeque<ProviderReply>>>,
    fallbacks: HashMap<String, String>,
    default_fallback: String,
}

impl ScriptedProvider {
    /// Provider where every unscripted turn produces `default_fallback`
    pub fn new(default_fallback: impl Into<String>) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            fallbacks: HashMap::new(),
            default_fallback: default_fallback.into(),
        }
    }

    /// Queue a scripted reply for one agent; queued replies are consumed
    /// in order before any fallback applies.
    pub fn enqueue(self, agent: &str, reply: ProviderReply) -> Self {
        self.scripts()
            .entry(agent.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    // A poisoned lock only means a panic elsewhere interrupted a queue
    // update; the scripts are plain data and stay usable.
    fn scripts(&self) -> MutexGuard<'_, HashMap<String, VecDeque<ProviderReply>>> {
        self.scripts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the line one agent falls back to once its queue is drained
    pub fn with_fallback(mut self, agent: &str, line: impl Into<String>) -> Self {
        self.fallbacks.insert(agent.to_string(), line.into());
        self
    }

    /// The canned walkthrough behind `standup run --offline`: the product
    /// owner plans two stories, everyone else reports steady progress, and
    /// the scrum master closes every run with the completion marker.
    pub fn sprint_demo(completion_marker: &str) -> Self {
        Self::new("Acknowledged. Proceeding with my part of the current item.")
            .enqueue(
                roles::PRODUCT_OWNER,
                ProviderReply::text(
                    "Breaking the goal into two stories and recording them in the backlog.",
                )
                .with_tool_requests(vec![
                    ToolRequest::new(capabilities::ADD_WORK_ITEM)
                        .with_arg("description", "Walking skeleton of the core flow".into())
                        .with_arg("priority", 1.into())
                        .with_arg("estimate", 5.into()),
                    ToolRequest::new(capabilities::ADD_WORK_ITEM)
                        .with_arg("description", "Acceptance checks and hardening".into())
                        .with_arg("priority", 2.into())
                        .with_arg("estimate", 3.into()),
                ]),
            )
            .with_fallback(
                roles::SCRUM_MASTER,
                format!("Nothing blocking from my side. Goal reached: {completion_marker}"),
            )
    }

    fn fallback_for(&self, agent: &str) -> ProviderReply {
        let line = self
            .fallbacks
            .get(agent)
            .unwrap_or(&self.default_fallback)
            .clone();
        ProviderReply::text(line)
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    async fn generate(
        &self,
        speaker: &AgentId,
        _messages: &[Message],
        _role_context: &str,
        _available_tools: &[ToolDescriptor],
    ) -> Result<ProviderReply, ProviderError> {
        let scripted = self
            .scripts()
            .get_mut(speaker.as_str())
            .and_then(VecDeque::pop_front);
        Ok(scripted.unwrap_or_else(|| self.fallback_for(speaker.as_str())))
    }
}

#[async_trait]
impl SpeakerChooser for ScriptedProvider {
    /// Deterministic choice: the roster agent after the last speaker, in
    /// roster order. Keeps AUTO-pattern runs reproducible offline.
    async fn choose(
        &self,
        transcript: &Transcript,
        roster: &Roster,
    ) -> Result<String, ProviderError> {
        let next = transcript
            .last()
            .and_then(|m| roster.position(&m.sender))
            .map(|i| (i + 1) % roster.len())
            .unwrap_or(0);
        Ok(roster.agents()[next].id().as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use standup_domain::Agent;

    #[tokio::test]
    async fn test_scripted_replies_then_fallback() {
        let provider = ScriptedProvider::new("steady progress")
            .enqueue("dev", ProviderReply::text("first"))
            .enqueue("dev", ProviderReply::text("second"));
        let dev = AgentId::new("dev");

        for expected in ["first", "second", "steady progress", "steady progress"] {
            let reply = provider.generate(&dev, &[], "", &[]).await.unwrap();
            assert_eq!(reply.content, expected);
        }
    }

    #[tokio::test]
    async fn test_per_agent_fallback_wins_over_default() {
        let provider = ScriptedProvider::new("generic").with_fallback("sm", "all done");
        let reply = provider
            .generate(&AgentId::new("sm"), &[], "", &[])
            .await
            .unwrap();
        assert_eq!(reply.content, "all done");
        let reply = provider
            .generate(&AgentId::new("dev"), &[], "", &[])
            .await
            .unwrap();
        assert_eq!(reply.content, "generic");
    }

    #[tokio::test]
    async fn test_chooser_rotates_through_roster() {
        let roster = Roster::from_agents(vec![
            Agent::responder("a", "first"),
            Agent::responder("b", "second"),
        ])
        .unwrap();
        let provider = ScriptedProvider::new("x");

        let mut transcript = Transcript::new();
        assert_eq!(provider.choose(&transcript, &roster).await.unwrap(), "a");

        transcript
            .append(Message::new(AgentId::new("a"), "hello", 0))
            .unwrap();
        assert_eq!(provider.choose(&transcript, &roster).await.unwrap(), "b");

        transcript
            .append(Message::new(AgentId::new("b"), "reply", 1))
            .unwrap();
        assert_eq!(provider.choose(&transcript, &roster).await.unwrap(), "a");
    }

    #[tokio::test]
    async fn test_sprint_demo_plans_two_stories() {
        let provider = ScriptedProvider::sprint_demo("SPRINT_COMPLETE!");
        let reply = provider
            .generate(&AgentId::new(roles::PRODUCT_OWNER), &[], "", &[])
            .await
            .unwrap();
        assert_eq!(reply.tool_requests.len(), 2);
        assert_eq!(reply.tool_requests[0].name, capabilities::ADD_WORK_ITEM);

        let closing = provider
            .generate(&AgentId::new(roles::SCRUM_MASTER), &[], "", &[])
            .await
            .unwrap();
        assert!(closing.content.contains("SPRINT_COMPLETE!"));
    }
}
