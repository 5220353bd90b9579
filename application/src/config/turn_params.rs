//! Turn execution parameters.
//!
//! [`TurnParams`] groups the static parameters that control a single
//! speaker turn in [`GroupChatOrchestrator`](crate::use_cases::run_chat::GroupChatOrchestrator).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn execution control parameters.
///
/// Controls the per-turn wall-clock timeout and how many attempts a
/// speaker gets before a transient failure is treated as fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnParams {
    /// Wall-clock timeout for a single turn attempt.
    pub turn_timeout: Duration,
    /// Retries after the first transient failure. Two means a turn gets
    /// three attempts in total before the run escalates to failed.
    pub retry_budget: u32,
}

impl Default for TurnParams {
    fn default() -> Self {
        Self {
            turn_timeout: Duration::from_secs(120),
            retry_budget: 2,
        }
    }
}

impl TurnParams {
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_retry_budget(mut self, budget: u32) -> Self {
        self.retry_budget = budget;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = TurnParams::default();
        assert_eq!(params.turn_timeout, Duration::from_secs(120));
        assert_eq!(params.retry_budget, 2);
    }

    #[test]
    fn test_builder() {
        let params = TurnParams::default()
            .with_turn_timeout(Duration::from_secs(30))
            .with_retry_budget(1);

        assert_eq!(params.turn_timeout, Duration::from_secs(30));
        assert_eq!(params.retry_budget, 1);
    }
}
