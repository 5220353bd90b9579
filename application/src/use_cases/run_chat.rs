//! Group chat orchestration.
//!
//! [`GroupChatOrchestrator`] drives one conversation run through its state
//! machine: validate at `INIT`, then loop in `RUNNING` — select a speaker,
//! execute the turn, append the message, evaluate termination — until the
//! run resolves to completed, aborted, or failed. The round count
//! increments on append, never on selection, so a retried turn does not
//! consume budget.
//!
//! The orchestrator owns the transcript exclusively. All turn-level
//! failures end up inside the returned [`ChatOutcome`] as data; the only
//! errors thrown from [`run`](GroupChatOrchestrator::run) are
//! configuration errors raised before the first turn.

use std::sync::Arc;

use standup_domain::{
    Agent, AgentId, ChatConfig, ChatOutcome, GroupChatPattern, HumanInputMode, Message, Roster,
    SelectionFault, SelectionStep, StopReason, Transcript, TurnFailure, TurnFailureKind,
    check_choice, least_recent_fallback, round_robin_next, sequential_next,
};
use standup_domain::core::error::DomainError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::TurnParams;
use crate::ports::chat_events::{ChatEvent, ChatEventSink, NoChatEvents};
use crate::ports::human_input::{HumanInput, HumanSignal, NoHumanInput};
use crate::ports::inference::InferenceProvider;
use crate::ports::speaker_chooser::SpeakerChooser;
use crate::ports::tool_runner::{NoTools, ToolRunner};
use crate::use_cases::turn::{TurnError, TurnExecutor};

/// Sender id of the seed message a task-driven run starts from.
///
/// Not a roster member: the seed carries the work description into the
/// transcript without consuming a round.
pub const TASK_SENDER: &str = "task";

/// Use case driving one turn-based group conversation
pub struct GroupChatOrchestrator {
    roster: Roster,
    config: ChatConfig,
    params: TurnParams,
    provider: Arc<dyn InferenceProvider>,
    chooser: Option<Arc<dyn SpeakerChooser>>,
    tools: Arc<dyn ToolRunner>,
    human_input: Arc<dyn HumanInput>,
    events: Arc<dyn ChatEventSink>,
    cancellation: Option<CancellationToken>,
}

impl GroupChatOrchestrator {
    pub fn new(roster: Roster, config: ChatConfig, provider: Arc<dyn InferenceProvider>) -> Self {
        Self {
            roster,
            config,
            params: TurnParams::default(),
            provider,
            chooser: None,
            tools: Arc::new(NoTools),
            human_input: Arc::new(NoHumanInput),
            events: Arc::new(NoChatEvents),
            cancellation: None,
        }
    }

    /// Selector capability consulted by the AUTO pattern
    pub fn with_chooser(mut self, chooser: Arc<dyn SpeakerChooser>) -> Self {
        self.chooser = Some(chooser);
        self
    }

    pub fn with_tools(mut self, tools: Arc<dyn ToolRunner>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_human_input(mut self, human_input: Arc<dyn HumanInput>) -> Self {
        self.human_input = human_input;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn ChatEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_params(mut self, params: TurnParams) -> Self {
        self.params = params;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Run the conversation until it resolves.
    pub async fn run(&self) -> Result<ChatOutcome, DomainError> {
        self.run_with_seed(None).await
    }

    /// Run the conversation, seeding the transcript with a task message.
    pub async fn run_task(&self, task: &str) -> Result<ChatOutcome, DomainError> {
        self.run_with_seed(Some(task)).await
    }

    async fn run_with_seed(&self, task: Option<&str>) -> Result<ChatOutcome, DomainError> {
        // INIT: configuration errors are fatal here, never retried.
        self.config.validate(&self.roster)?;
        info!(
            pattern = %self.config.pattern(),
            agents = self.roster.len(),
            "starting group chat"
        );

        let executor = TurnExecutor::new(
            self.provider.clone(),
            self.tools.clone(),
            self.human_input.clone(),
            self.params.clone(),
            self.cancellation.clone(),
        );

        let mut transcript = Transcript::new();
        if let Some(task) = task {
            transcript.append(Message::new(
                AgentId::new(TASK_SENDER),
                task,
                transcript.next_sequence(),
            ))?;
        }

        let mut last_speaker: Option<AgentId> = None;
        let mut rounds: u32 = 0;

        loop {
            if self.is_cancelled() {
                return Ok(self.finish(ChatOutcome::stopped(
                    StopReason::ExternalCancel,
                    transcript,
                    rounds,
                )));
            }

            // Select. A failed turn re-enters here with the same state, so
            // the same speaker is re-selected.
            let speaker = match self
                .select_speaker(&transcript, last_speaker.as_ref(), rounds)
                .await?
            {
                SelectionStep::Speak(id) => id,
                SelectionStep::Exhausted => {
                    return Ok(self.finish(ChatOutcome::stopped(
                        StopReason::SequenceExhausted,
                        transcript,
                        rounds,
                    )));
                }
            };
            let agent = self
                .roster
                .get(&speaker)
                .ok_or_else(|| DomainError::UnknownAgent(speaker.to_string()))?;

            // Execute with the per-turn retry budget.
            let message = match self.attempt_turn(&executor, agent, &transcript).await {
                Ok(message) => message,
                Err(failure) => {
                    return Ok(self.finish(ChatOutcome::failed(failure, transcript, rounds)));
                }
            };

            let sequence = message.sequence_number;
            transcript.append(message)?;
            rounds += 1;
            last_speaker = Some(speaker.clone());
            self.events.log(ChatEvent::new(
                "turn_completed",
                serde_json::json!({
                    "agent": speaker.as_str(),
                    "sequence": sequence,
                    "round": rounds,
                }),
            ));

            if let Some(reason) = self.evaluate_stop(&transcript, rounds) {
                if !reason.ends_aborted()
                    && self.human_keeps_going(&executor, &mut transcript, &mut rounds, &reason).await?
                {
                    last_speaker = self.config.final_agent().cloned();
                    // The continuation reply is an append like any other:
                    // it can carry the marker or land on the round budget.
                    if let Some(reason) = self.evaluate_stop(&transcript, rounds) {
                        return Ok(self.finish(ChatOutcome::stopped(reason, transcript, rounds)));
                    }
                    continue;
                }
                return Ok(self.finish(ChatOutcome::stopped(reason, transcript, rounds)));
            }
        }
    }

    /// One speaker's turn, retried on transient failures up to the budget
    async fn attempt_turn(
        &self,
        executor: &TurnExecutor,
        agent: &Agent,
        transcript: &Transcript,
    ) -> Result<Message, TurnFailure> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match executor
                .execute(agent, transcript, transcript.next_sequence())
                .await
            {
                Ok(message) => return Ok(message),
                Err(TurnError::Transient(detail)) => {
                    if attempts > self.params.retry_budget {
                        warn!(agent = %agent.id(), %detail, attempts, "turn failed, budget exhausted");
                        return Err(TurnFailure::new(
                            agent.id().clone(),
                            TurnFailureKind::Transient,
                            detail,
                            attempts,
                        ));
                    }
                    warn!(agent = %agent.id(), %detail, attempts, "transient turn failure, retrying");
                    self.events.log(ChatEvent::new(
                        "turn_retry",
                        serde_json::json!({
                            "agent": agent.id().as_str(),
                            "attempt": attempts,
                            "detail": detail,
                        }),
                    ));
                }
                Err(TurnError::Unrecoverable(detail)) => {
                    warn!(agent = %agent.id(), %detail, "unrecoverable turn failure");
                    return Err(TurnFailure::new(
                        agent.id().clone(),
                        TurnFailureKind::Unrecoverable,
                        detail,
                        attempts,
                    ));
                }
            }
        }
    }

    /// Apply the configured pattern; `rounds` indexes sequential lists.
    async fn select_speaker(
        &self,
        transcript: &Transcript,
        last_speaker: Option<&AgentId>,
        rounds: u32,
    ) -> Result<SelectionStep, DomainError> {
        if let GroupChatPattern::Sequential(order) = self.config.pattern() {
            return Ok(sequential_next(order, rounds as usize));
        }
        if last_speaker.is_none() {
            return Ok(SelectionStep::Speak(self.config.initial_speaker().clone()));
        }
        let speaker = match self.config.pattern() {
            GroupChatPattern::RoundRobin => round_robin_next(&self.roster, last_speaker)?,
            GroupChatPattern::Auto => {
                let candidate = self.delegated_choice(transcript).await;
                self.validated_or_fallback(transcript, last_speaker, candidate)?
            }
            GroupChatPattern::Custom(select) => {
                let candidate = select(transcript, &self.roster, last_speaker)
                    .ok_or(SelectionFault::NoCandidate);
                self.validated_or_fallback(transcript, last_speaker, candidate)?
            }
            GroupChatPattern::Sequential(_) => unreachable!("handled above"),
        };
        Ok(SelectionStep::Speak(speaker))
    }

    /// Ask the AUTO chooser for a candidate id
    async fn delegated_choice(&self, transcript: &Transcript) -> Result<AgentId, SelectionFault> {
        let Some(chooser) = &self.chooser else {
            return Err(SelectionFault::NoCandidate);
        };
        match chooser.choose(transcript, &self.roster).await {
            Ok(id) => Ok(AgentId::new(id.trim())),
            Err(e) => {
                debug!(error = %e, "speaker chooser call failed");
                Err(SelectionFault::NoCandidate)
            }
        }
    }

    /// Validate a delegated or custom candidate; fall back deterministically
    /// to the least-recently-spoken agent and log the selection failure.
    fn validated_or_fallback(
        &self,
        transcript: &Transcript,
        last_speaker: Option<&AgentId>,
        candidate: Result<AgentId, SelectionFault>,
    ) -> Result<AgentId, DomainError> {
        let (candidate, fault) = match candidate {
            Ok(id) => match check_choice(&self.roster, last_speaker, &id) {
                Ok(()) => return Ok(id),
                Err(fault) => (Some(id), fault),
            },
            Err(fault) => (None, fault),
        };
        let fallback = least_recent_fallback(transcript, &self.roster)?;
        warn!(
            candidate = candidate.as_ref().map(|c| c.as_str()).unwrap_or("<none>"),
            fault = %fault,
            fallback = %fallback,
            "selection failure, falling back to least-recent speaker"
        );
        self.events.log(ChatEvent::new(
            "selection_fallback",
            serde_json::json!({
                "candidate": candidate.as_ref().map(|c| c.as_str()),
                "fault": fault.as_str(),
                "fallback": fallback.as_str(),
            }),
        ));
        Ok(fallback)
    }

    /// Evaluate the termination policy after an append
    fn evaluate_stop(&self, transcript: &Transcript, rounds: u32) -> Option<StopReason> {
        let latest = transcript.last();
        let sender = latest.and_then(|m| self.roster.get(&m.sender));
        self.config
            .policy()
            .should_stop(self.is_cancelled(), rounds, latest, sender)
    }

    /// Consult the final agent's human once a normal termination fires,
    /// when that agent runs in on-termination mode. A reply is appended as
    /// the agent's message and keeps the conversation going.
    async fn human_keeps_going(
        &self,
        executor: &TurnExecutor,
        transcript: &mut Transcript,
        rounds: &mut u32,
        reason: &StopReason,
    ) -> Result<bool, DomainError> {
        let Some(agent) = self
            .config
            .final_agent()
            .and_then(|id| self.roster.get(id))
            .filter(|a| a.human_input_mode() == HumanInputMode::OnTermination)
        else {
            return Ok(false);
        };

        let prompt = format!("Conversation is about to end ({reason}). Reply to keep it going.");
        match executor.consult_on_termination(agent.id(), &prompt).await {
            Ok(HumanSignal::Reply(text)) => {
                transcript.append(Message::new(
                    agent.id().clone(),
                    text,
                    transcript.next_sequence(),
                ))?;
                *rounds += 1;
                info!(agent = %agent.id(), "human kept the conversation going");
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) => {
                warn!(error = %e, "on-termination consultation failed, finalizing");
                Ok(false)
            }
        }
    }

    fn finish(&self, outcome: ChatOutcome) -> ChatOutcome {
        info!(
            status = %outcome.status,
            reason = outcome.reason_code(),
            rounds = outcome.rounds,
            "group chat finished"
        );
        self.events.log(ChatEvent::new(
            "run_finished",
            serde_json::json!({
                "status": outcome.status.as_str(),
                "reason": outcome.reason_code(),
                "rounds": outcome.rounds,
            }),
        ));
        outcome
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
