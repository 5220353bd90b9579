//! Terminal result of one orchestration run.
//!
//! A run always resolves into a [`ChatOutcome`] carrying the full
//! transcript accumulated so far and a machine-readable reason, whatever
//! the terminal status. Callers never receive a truncated result without
//! a reason code.

use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::chat::transcript::Transcript;
use crate::termination::StopReason;

/// Terminal status of an orchestration run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    /// Normal end: a termination condition was satisfied
    Completed,
    /// Deliberate stop: external cancel or an exhausted round budget
    Aborted,
    /// Operational malfunction during a turn
    Failed,
}

impl ChatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatStatus::Completed => "completed",
            ChatStatus::Aborted => "aborted",
            ChatStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a turn-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnFailureKind {
    /// Provider timeout, tool I/O, input transport. Retried up to the budget.
    Transient,
    /// Malformed agent output or contract violation. Never retried.
    Unrecoverable,
}

impl TurnFailureKind {
    pub fn code(&self) -> &'static str {
        match self {
            TurnFailureKind::Transient => "transient-failure",
            TurnFailureKind::Unrecoverable => "unrecoverable-failure",
        }
    }
}

/// Record of the turn failure that moved a run to [`ChatStatus::Failed`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnFailure {
    pub agent: AgentId,
    pub kind: TurnFailureKind,
    pub detail: String,
    /// Attempts made for the turn, including the first one
    pub attempts: u32,
}

impl TurnFailure {
    pub fn new(
        agent: AgentId,
        kind: TurnFailureKind,
        detail: impl Into<String>,
        attempts: u32,
    ) -> Self {
        Self {
            agent,
            kind,
            detail: detail.into(),
            attempts,
        }
    }
}

/// Complete, inspectable result of one orchestration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub status: ChatStatus,
    pub stop_reason: Option<StopReason>,
    pub failure: Option<TurnFailure>,
    pub transcript: Transcript,
    /// Completed rounds, i.e. appended messages
    pub rounds: u32,
}

impl ChatOutcome {
    /// Outcome for a run ended by a termination condition.
    ///
    /// The status follows the stop reason: deliberate stops (cancel,
    /// round budget) abort, everything else completes.
    pub fn stopped(stop_reason: StopReason, transcript: Transcript, rounds: u32) -> Self {
        let status = if stop_reason.ends_aborted() {
            ChatStatus::Aborted
        } else {
            ChatStatus::Completed
        };
        Self {
            status,
            stop_reason: Some(stop_reason),
            failure: None,
            transcript,
            rounds,
        }
    }

    /// Outcome for a run ended by an operational malfunction
    pub fn failed(failure: TurnFailure, transcript: Transcript, rounds: u32) -> Self {
        Self {
            status: ChatStatus::Failed,
            stop_reason: None,
            failure: Some(failure),
            transcript,
            rounds,
        }
    }

    /// Machine-readable reason for the terminal status
    pub fn reason_code(&self) -> &'static str {
        if let Some(reason) = &self.stop_reason {
            return reason.code();
        }
        if let Some(failure) = &self.failure {
            return failure.kind.code();
        }
        "unknown"
    }
}
