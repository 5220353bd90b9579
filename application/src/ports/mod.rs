//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_events;
pub mod human_input;
pub mod inference;
pub mod memory_store;
pub mod speaker_chooser;
pub mod tool_runner;
