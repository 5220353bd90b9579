//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Append out of order: expected sequence {expected}, got {got}")]
    OrderViolation { expected: u64, got: u64 },

    #[error("No eligible speaker for the configured pattern")]
    NoEligibleSpeaker,

    #[error("Roster is empty")]
    EmptyRoster,

    #[error("Duplicate agent id: {0}")]
    DuplicateAgent(String),

    #[error("Agent not in roster: {0}")]
    UnknownAgent(String),

    #[error("max_rounds must be greater than zero")]
    InvalidMaxRounds,

    #[error("Conversation has no content marker and no max_rounds bound")]
    UnboundedConversation,

    #[error("Invalid sprint configuration: {0}")]
    InvalidSprintConfig(String),

    #[error("Unknown work item: {0}")]
    UnknownWorkItem(String),
}

impl DomainError {
    /// Check if this error is a configuration error (fatal at startup, never retried)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyRoster
                | DomainError::DuplicateAgent(_)
                | DomainError::UnknownAgent(_)
                | DomainError::InvalidMaxRounds
                | DomainError::UnboundedConversation
                | DomainError::InvalidSprintConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_violation_display() {
        let error = DomainError::OrderViolation {
            expected: 3,
            got: 5,
        };
        assert_eq!(
            error.to_string(),
            "Append out of order: expected sequence 3, got 5"
        );
    }

    #[test]
    fn test_configuration_check() {
        assert!(DomainError::EmptyRoster.is_configuration());
        assert!(DomainError::UnboundedConversation.is_configuration());
        assert!(DomainError::DuplicateAgent("dev".to_string()).is_configuration());
        assert!(!DomainError::NoEligibleSpeaker.is_configuration());
        assert!(!DomainError::OrderViolation { expected: 0, got: 1 }.is_configuration());
    }
}
