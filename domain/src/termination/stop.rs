//! Stop reasons: which termination rule ended a run.

use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

/// The rule that terminated a conversation, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum StopReason {
    /// The external cancel flag was raised
    ExternalCancel,
    /// The round budget is exhausted
    MaxRounds { limit: u32 },
    /// The latest message contains the configured marker
    ContentMarker { marker: String, sequence_number: u64 },
    /// The latest message's sender declared termination itself
    AgentDeclared { agent: AgentId },
    /// A sequential speaker list ran out of entries
    SequenceExhausted,
}

impl StopReason {
    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            StopReason::ExternalCancel => "external-cancel",
            StopReason::MaxRounds { .. } => "max-rounds",
            StopReason::ContentMarker { .. } => "content-marker",
            StopReason::AgentDeclared { .. } => "agent-declared",
            StopReason::SequenceExhausted => "sequence-exhausted",
        }
    }

    /// Deliberate stops (cancel, exhausted round budget) abort the run;
    /// every other reason completes it normally.
    pub fn ends_aborted(&self) -> bool {
        matches!(self, StopReason::ExternalCancel | StopReason::MaxRounds { .. })
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::ExternalCancel => write!(f, "external cancel"),
            StopReason::MaxRounds { limit } => write!(f, "max rounds exceeded ({limit})"),
            StopReason::ContentMarker { marker, .. } => write!(f, "content marker '{marker}'"),
            StopReason::AgentDeclared { agent } => write!(f, "declared by agent '{agent}'"),
            StopReason::SequenceExhausted => write!(f, "speaker sequence exhausted"),
        }
    }
}
