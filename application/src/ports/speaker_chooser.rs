//! Speaker chooser port for the AUTO selection pattern.
//!
//! The chooser is a selector capability (typically backed by the inference
//! provider) that proposes the next speaker. Its result is a raw candidate
//! id: the orchestrator validates it against the roster and falls back
//! deterministically when it is unusable.

use async_trait::async_trait;
use standup_domain::{Roster, Transcript};

use crate::ports::inference::ProviderError;

/// Port for delegated next-speaker selection
#[async_trait]
pub trait SpeakerChooser: Send + Sync {
    /// Propose the id of the agent that should speak next.
    ///
    /// Receives the transcript and the roster (ids plus role
    /// descriptions). The returned string is unvalidated.
    async fn choose(
        &self,
        transcript: &Transcript,
        roster: &Roster,
    ) -> Result<String, ProviderError>;
}
