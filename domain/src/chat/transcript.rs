//! Append-only conversation transcript.
//!
//! The transcript is the shared, ordered message log of one orchestration
//! run. Insertion order is causal order: sequence numbers are strictly
//! increasing and gap-free, and nothing is ever removed. Corrections are
//! modeled as new messages referencing the one they supersede.

use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::chat::message::Message;
use crate::core::error::DomainError;

/// Ordered, append-only message log for one conversation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Sequence number the next appended message must carry
    pub fn next_sequence(&self) -> u64 {
        self.messages.len() as u64
    }

    /// Append a message.
    ///
    /// Fails with [`DomainError::OrderViolation`] unless the message's
    /// sequence number is exactly `last + 1` (zero for the first message).
    pub fn append(&mut self, message: Message) -> Result<(), DomainError> {
        let expected = self.next_sequence();
        if message.sequence_number != expected {
            return Err(DomainError::OrderViolation {
                expected,
                got: message.sequence_number,
            });
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Read-only view of `[from, to)` by sequence number, clamped to bounds
    pub fn slice(&self, from: u64, to: u64) -> &[Message] {
        let len = self.messages.len() as u64;
        let from = from.min(len) as usize;
        let to = to.min(len) as usize;
        if from >= to {
            return &[];
        }
        &self.messages[from..to]
    }

    /// The last `k` messages, for bounded context construction
    pub fn last_n(&self, k: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(k);
        &self.messages[start..]
    }

    /// Sequence number of the given agent's most recent message, if any
    pub fn last_turn_of(&self, agent: &AgentId) -> Option<u64> {
        self.messages
            .iter()
            .rev()
            .find(|m| &m.sender == agent)
            .map(|m| m.sequence_number)
    }
}
