//! Human input port.
//!
//! Human-proxy turns and on-termination consultations suspend on this
//! interface. Timeouts and cancellations are ordinary values, not errors:
//! they resolve into a cancellation-marked message upstream. Only a broken
//! transport is an error, and the orchestrator treats it as transient.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors of the input transport itself
#[derive(Error, Debug, Clone)]
pub enum HumanInputError {
    #[error("Input transport failed: {0}")]
    Transport(String),
}

/// What came back from the human
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanSignal {
    /// The human answered with this text
    Reply(String),
    /// No answer within the timeout
    TimedOut,
    /// The human explicitly declined to answer
    Cancelled,
}

/// Port for requesting input from a human
#[async_trait]
pub trait HumanInput: Send + Sync {
    /// Ask the human for input, waiting up to `timeout`.
    async fn request_input(
        &self,
        prompt: &str,
        timeout: Duration,
    ) -> Result<HumanSignal, HumanInputError>;
}

/// Unattended implementation: every request times out immediately.
///
/// The safe default for fully automated rosters, where a human-proxy turn
/// should resolve into a cancellation-marked message rather than hang.
pub struct NoHumanInput;

#[async_trait]
impl HumanInput for NoHumanInput {
    async fn request_input(
        &self,
        _prompt: &str,
        _timeout: Duration,
    ) -> Result<HumanSignal, HumanInputError> {
        Ok(HumanSignal::TimedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_human_input_times_out() {
        let input = NoHumanInput;
        let signal = input
            .request_input("approve?", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(signal, HumanSignal::TimedOut);
    }
}
