//! Pure speaker-selection rules.
//!
//! Deterministic building blocks the orchestrator combines per pattern:
//! round-robin stepping, sequential stepping with exhaustion, the
//! least-recent-turn fallback for delegated selection, and validation of
//! delegated/custom choices. None of these touch any state.

use crate::agent::{AgentId, Roster};
use crate::chat::transcript::Transcript;
use crate::core::error::DomainError;

/// One selection step of a sequential pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStep {
    Speak(AgentId),
    /// The predeclared order is used up; the pattern signals termination
    /// instead of wrapping.
    Exhausted,
}

/// Why a delegated or custom choice was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionFault {
    /// The chooser produced no usable candidate at all
    NoCandidate,
    /// The candidate is not a registered agent
    NotInRoster,
    /// The candidate would speak twice in a row in a roster of several
    RepeatsLastSpeaker,
}

impl SelectionFault {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionFault::NoCandidate => "no-candidate",
            SelectionFault::NotInRoster => "not-in-roster",
            SelectionFault::RepeatsLastSpeaker => "repeats-last-speaker",
        }
    }
}

impl std::fmt::Display for SelectionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Next agent in registration order after `last_speaker`, wrapping.
///
/// With no last speaker the first registered agent is chosen. A roster of
/// one always re-selects its only agent.
pub fn round_robin_next(
    roster: &Roster,
    last_speaker: Option<&AgentId>,
) -> Result<AgentId, DomainError> {
    if roster.is_empty() {
        return Err(DomainError::NoEligibleSpeaker);
    }
    let next = match last_speaker.and_then(|id| roster.position(id)) {
        Some(pos) => (pos + 1) % roster.len(),
        None => 0,
    };
    Ok(roster.agents()[next].id().clone())
}

/// Speaker for the round at `completed_rounds` in a predeclared order.
///
/// Indexed by completed (appended) rounds, so a retried turn re-selects
/// the same entry.
pub fn sequential_next(order: &[AgentId], completed_rounds: usize) -> SelectionStep {
    match order.get(completed_rounds) {
        Some(id) => SelectionStep::Speak(id.clone()),
        None => SelectionStep::Exhausted,
    }
}

/// Deterministic fallback: the agent with the least-recent turn.
///
/// Agents that never spoke come first; ties are broken by registration
/// order.
pub fn least_recent_fallback(
    transcript: &Transcript,
    roster: &Roster,
) -> Result<AgentId, DomainError> {
    roster
        .agents()
        .iter()
        .min_by_key(|agent| {
            transcript
                .last_turn_of(agent.id())
                .map_or(-1i64, |seq| seq as i64)
        })
        .map(|agent| agent.id().clone())
        .ok_or(DomainError::NoEligibleSpeaker)
}

/// Validate a delegated (AUTO) or custom choice.
///
/// The candidate must be registered and must not repeat the last speaker
/// when the roster has more than one agent.
pub fn check_choice(
    roster: &Roster,
    last_speaker: Option<&AgentId>,
    candidate: &AgentId,
) -> Result<(), SelectionFault> {
    if !roster.contains(candidate) {
        return Err(SelectionFault::NotInRoster);
    }
    if roster.len() > 1 && last_speaker == Some(candidate) {
        return Err(SelectionFault::RepeatsLastSpeaker);
    }
    Ok(())
}
