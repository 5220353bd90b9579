//! Use cases
//!
//! Application-level operations that orchestrate domain logic: a single
//! speaker turn, one bounded group conversation, and a full sprint of
//! repeated conversations.

pub mod run_chat;
pub mod run_sprint;
pub mod turn;
