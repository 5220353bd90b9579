//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases
//! behave:
//!
//! - [`TurnParams`] — per-turn control (timeout, retry budget)

pub mod turn_params;

pub use turn_params::TurnParams;
