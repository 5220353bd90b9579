//! Single-turn execution.
//!
//! [`TurnExecutor`] runs one agent's turn: it dispatches on the agent's
//! behavior variant, enforces the per-turn timeout, honors the cancellation
//! signal, and isolates tool failures inside the produced message. The
//! executor never appends anything itself; the orchestrator owns the
//! transcript.
//!
//! A raised cancellation or a human-input timeout resolves the turn into a
//! cancellation-marked [`Message`] rather than an error, so the run can
//! finish with a complete transcript. Operational problems come back as
//! [`TurnError`], classified for the orchestrator's retry logic.

use std::sync::Arc;

use standup_domain::{
    Agent, AgentBehavior, AgentId, Message, ToolInvocation, Transcript,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::TurnParams;
use crate::ports::human_input::{HumanInput, HumanSignal};
use crate::ports::inference::{InferenceProvider, ProviderError, ProviderReply};
use crate::ports::tool_runner::{ToolDescriptor, ToolRunner};

/// A turn that went wrong, classified for retry handling
#[derive(Error, Debug, Clone)]
pub enum TurnError {
    /// Provider timeout, tool transport, input transport. Worth retrying
    /// with the same speaker.
    #[error("transient turn failure: {0}")]
    Transient(String),

    /// Malformed agent output or a contract violation. Never retried.
    #[error("unrecoverable turn failure: {0}")]
    Unrecoverable(String),
}

/// Executes one speaker turn against the configured ports
pub struct TurnExecutor {
    provider: Arc<dyn InferenceProvider>,
    tools: Arc<dyn ToolRunner>,
    human_input: Arc<dyn HumanInput>,
    params: TurnParams,
    cancellation: Option<CancellationToken>,
}

impl TurnExecutor {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        tools: Arc<dyn ToolRunner>,
        human_input: Arc<dyn HumanInput>,
        params: TurnParams,
        cancellation: Option<CancellationToken>,
    ) -> Self {
        Self {
            provider,
            tools,
            human_input,
            params,
            cancellation,
        }
    }

    /// Run one turn for `agent`, producing its candidate message.
    ///
    /// `sequence` is the number the message must carry for the append that
    /// follows. The full transcript is handed to the provider as context.
    pub async fn execute(
        &self,
        agent: &Agent,
        transcript: &Transcript,
        sequence: u64,
    ) -> Result<Message, TurnError> {
        if self.is_cancelled() {
            return Ok(Message::cancellation(
                agent.id().clone(),
                sequence,
                "turn cancelled before it started",
            ));
        }

        if agent.is_human_proxy() {
            return self.human_turn(agent, transcript, sequence).await;
        }

        let attempt = self.automated_turn(agent, transcript, sequence);
        let result = if let Some(token) = &self.cancellation {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    return Ok(Message::cancellation(
                        agent.id().clone(),
                        sequence,
                        "turn cancelled",
                    ));
                }
                r = tokio::time::timeout(self.params.turn_timeout, attempt) => r,
            }
        } else {
            tokio::time::timeout(self.params.turn_timeout, attempt).await
        };

        match result {
            Ok(turn) => turn,
            Err(_) => Err(TurnError::Transient(format!(
                "turn exceeded the {}s timeout",
                self.params.turn_timeout.as_secs()
            ))),
        }
    }

    /// Provider-backed turn, optionally executing tool requests
    async fn automated_turn(
        &self,
        agent: &Agent,
        transcript: &Transcript,
        sequence: u64,
    ) -> Result<Message, TurnError> {
        let available: Vec<ToolDescriptor> = self
            .tools
            .descriptors()
            .into_iter()
            .filter(|d| agent.has_capability(&d.name))
            .collect();

        let reply = self
            .provider
            .generate(
                agent.id(),
                transcript.messages(),
                agent.role_description(),
                &available,
            )
            .await
            .map_err(classify_provider_error)?;

        if reply.content.is_empty() && reply.tool_requests.is_empty() {
            return Err(TurnError::Unrecoverable(format!(
                "agent '{}' produced an empty reply",
                agent.id()
            )));
        }
        if !reply.tool_requests.is_empty()
            && !matches!(agent.behavior(), AgentBehavior::ToolUser { .. })
        {
            return Err(TurnError::Unrecoverable(format!(
                "agent '{}' requested {} tool call(s) without tool capabilities",
                agent.id(),
                reply.tool_requests.len()
            )));
        }

        let tool_calls = self.run_tool_requests(agent, &reply).await;
        Ok(Message::new(agent.id().clone(), reply.content, sequence).with_tool_calls(tool_calls))
    }

    /// Execute the reply's tool requests with per-invocation failure
    /// isolation: a failing tool becomes a failed invocation record, never
    /// an aborted turn.
    async fn run_tool_requests(&self, agent: &Agent, reply: &ProviderReply) -> Vec<ToolInvocation> {
        let mut invocations = Vec::with_capacity(reply.tool_requests.len());
        for request in &reply.tool_requests {
            let outcome = if agent.has_capability(&request.name) {
                self.tools
                    .invoke(agent.id(), &request.name, &request.arguments)
                    .await
            } else {
                standup_domain::ToolOutcome::failed(format!(
                    "capability '{}' not granted to agent '{}'",
                    request.name,
                    agent.id()
                ))
            };
            if let Some(error) = &outcome.error {
                tracing::warn!(
                    agent = %agent.id(),
                    tool = %request.name,
                    error = %error,
                    "tool invocation failed"
                );
            }
            invocations.push(ToolInvocation::from_outcome(
                request.name.clone(),
                request.arguments.clone(),
                outcome,
            ));
        }
        invocations
    }

    /// Human-proxy turn: suspend for external input.
    ///
    /// A timeout or an explicit decline resolves into a cancellation-marked
    /// message; only a broken transport is an error.
    async fn human_turn(
        &self,
        agent: &Agent,
        transcript: &Transcript,
        sequence: u64,
    ) -> Result<Message, TurnError> {
        let timeout = agent.input_timeout().unwrap_or(self.params.turn_timeout);
        let prompt = transcript
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_else(|| "(conversation start)".to_string());

        // The timeout handed to the adapter is advisory; the executor
        // bounds the wait itself so an adapter that ignores it cannot
        // hang the turn.
        let request = tokio::time::timeout(timeout, self.human_input.request_input(&prompt, timeout));
        let bounded = if let Some(token) = &self.cancellation {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    return Ok(Message::cancellation(
                        agent.id().clone(),
                        sequence,
                        "turn cancelled",
                    ));
                }
                r = request => r,
            }
        } else {
            request.await
        };
        let signal = bounded.unwrap_or(Ok(HumanSignal::TimedOut));

        match signal {
            Ok(HumanSignal::Reply(text)) => Ok(Message::new(agent.id().clone(), text, sequence)),
            Ok(HumanSignal::TimedOut) => Ok(Message::cancellation(
                agent.id().clone(),
                sequence,
                "human input timed out",
            )),
            Ok(HumanSignal::Cancelled) => Ok(Message::cancellation(
                agent.id().clone(),
                sequence,
                "human input cancelled",
            )),
            Err(e) => Err(TurnError::Transient(e.to_string())),
        }
    }

    /// Consult the human once a termination condition fires, for agents in
    /// on-termination mode. A reply keeps the conversation going.
    ///
    /// Bounded like any other human wait: an elapsed timeout resolves to
    /// [`HumanSignal::TimedOut`], a raised cancellation to
    /// [`HumanSignal::Cancelled`].
    pub async fn consult_on_termination(
        &self,
        agent: &AgentId,
        prompt: &str,
    ) -> Result<HumanSignal, TurnError> {
        let request = tokio::time::timeout(
            self.params.turn_timeout,
            self.human_input.request_input(prompt, self.params.turn_timeout),
        );
        let bounded = if let Some(token) = &self.cancellation {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Ok(HumanSignal::Cancelled),
                r = request => r,
            }
        } else {
            request.await
        };
        let signal = bounded
            .unwrap_or(Ok(HumanSignal::TimedOut))
            .map_err(|e| TurnError::Transient(e.to_string()))?;
        tracing::debug!(agent = %agent, signal = ?signal, "on-termination consultation");
        Ok(signal)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}

fn classify_provider_error(error: ProviderError) -> TurnError {
    // Both variants are operational provider problems worth retrying.
    TurnError::Transient(error.to_string())
}
