//! Domain layer for standup
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! A group of role-bound [`agent::Agent`]s takes turns appending to a shared
//! [`chat::Transcript`]. A [`selection::GroupChatPattern`] decides who speaks
//! next; a [`termination::TerminationPolicy`] decides when the conversation
//! ends and why.
//!
//! ## Sprint
//!
//! A [`sprint::Sprint`] bounds repeated conversations pursuing one goal:
//! a planning run grows the [`sprint::Backlog`], execution runs work through
//! the committed items, and a retrospective run closes the cycle.

pub mod agent;
pub mod capabilities;
pub mod chat;
pub mod core;
pub mod memory;
pub mod selection;
pub mod sprint;
pub mod team;
pub mod termination;

// Re-export commonly used types
pub use agent::{Agent, AgentBehavior, AgentId, HumanInputMode, Roster, TerminationPredicate};
pub use chat::{
    ChatConfig, ChatOutcome, ChatStatus, Message, ToolInvocation, ToolOutcome, ToolStatus,
    Transcript, TurnFailure, TurnFailureKind,
};
pub use core::error::DomainError;
pub use memory::MemoryRecord;
pub use selection::{
    GroupChatPattern, SelectionFault, SelectionStep, SelectorFn, check_choice,
    least_recent_fallback, round_robin_next, sequential_next,
};
pub use sprint::{
    Backlog, IterationRecord, Sprint, SprintConfig, SprintPhase, SprintResult, SprintStatus,
    WorkItem, WorkItemStatus,
};
pub use team::Team;
pub use termination::{DEFAULT_COMPLETION_MARKER, StopReason, TerminationPolicy};
