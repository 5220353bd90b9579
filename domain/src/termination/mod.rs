//! Termination rules: when a conversation ends, and why.

pub mod policy;
pub mod stop;

pub use policy::{DEFAULT_COMPLETION_MARKER, TerminationPolicy};
pub use stop::StopReason;
