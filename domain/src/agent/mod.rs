//! Agent domain module
//!
//! Contains the agent entity, behavior variants, and the
//! registration-ordered roster.

pub mod entities;
pub mod roster;

pub use entities::{Agent, AgentBehavior, AgentId, HumanInputMode, TerminationPredicate};
pub use roster::Roster;
