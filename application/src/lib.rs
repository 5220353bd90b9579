//! Application layer for standup
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.
//!
//! The use cases compose into one another: [`TurnExecutor`] resolves a
//! single speaker turn, [`GroupChatOrchestrator`] drives turns into a
//! bounded conversation, and [`SprintController`] drives conversations
//! into a sprint. Everything external (inference, tools, human input,
//! memory, event logs) enters through the ports in [`ports`].

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::TurnParams;
pub use ports::{
    chat_events::{ChatEvent, ChatEventSink, NoChatEvents},
    human_input::{HumanInput, HumanSignal, NoHumanInput},
    inference::{InferenceProvider, ProviderError, ProviderReply, ToolRequest},
    memory_store::{MemoryError, MemoryStore},
    speaker_chooser::SpeakerChooser,
    tool_runner::{NoTools, ToolDescriptor, ToolRunner},
};
pub use use_cases::run_chat::{GroupChatOrchestrator, TASK_SENDER};
pub use use_cases::run_sprint::SprintController;
pub use use_cases::turn::{TurnError, TurnExecutor};
