//! Group chat selection patterns.

use std::sync::Arc;

use crate::agent::{AgentId, Roster};
use crate::chat::transcript::Transcript;

/// Injected pure selection function for [`GroupChatPattern::Custom`].
///
/// Receives the transcript, the roster, and the last speaker; returns the
/// chosen next speaker, or `None` to signal it has no candidate.
pub type SelectorFn =
    Arc<dyn Fn(&Transcript, &Roster, Option<&AgentId>) -> Option<AgentId> + Send + Sync>;

/// Strategy deciding which agent speaks next
#[derive(Clone)]
pub enum GroupChatPattern {
    /// Registration order after the last speaker, wrapping
    RoundRobin,
    /// Fixed predeclared order; exhaustion signals termination
    Sequential(Vec<AgentId>),
    /// Delegated to a selector capability, with a deterministic fallback
    Auto,
    /// Injected pure selection function
    Custom(SelectorFn),
}

impl GroupChatPattern {
    pub fn name(&self) -> &'static str {
        match self {
            GroupChatPattern::RoundRobin => "round_robin",
            GroupChatPattern::Sequential(_) => "sequential",
            GroupChatPattern::Auto => "auto",
            GroupChatPattern::Custom(_) => "custom",
        }
    }
}

impl std::fmt::Debug for GroupChatPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupChatPattern::Sequential(order) => {
                f.debug_tuple("Sequential").field(order).finish()
            }
            GroupChatPattern::Custom(_) => f.write_str("Custom(..)"),
            other => f.write_str(other.name()),
        }
    }
}

impl std::fmt::Display for GroupChatPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_names() {
        assert_eq!(GroupChatPattern::RoundRobin.name(), "round_robin");
        assert_eq!(GroupChatPattern::Auto.name(), "auto");
        assert_eq!(
            GroupChatPattern::Sequential(vec![AgentId::new("dev")]).name(),
            "sequential"
        );
        let custom = GroupChatPattern::Custom(Arc::new(|_, _, _| None));
        assert_eq!(custom.name(), "custom");
        assert_eq!(format!("{custom:?}"), "Custom(..)");
    }
}
