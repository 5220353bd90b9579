//! Conversation data: messages, the append-only transcript, per-run
//! configuration, and terminal outcomes.

pub mod config;
pub mod message;
pub mod outcome;
pub mod transcript;

pub use config::ChatConfig;
pub use message::{Message, ToolInvocation, ToolOutcome, ToolStatus};
pub use outcome::{ChatOutcome, ChatStatus, TurnFailure, TurnFailureKind};
pub use transcript::Transcript;
