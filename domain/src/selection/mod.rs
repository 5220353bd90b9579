//! Speaker selection: patterns and the pure rules behind them.

pub mod pattern;
pub mod selector;

pub use pattern::{GroupChatPattern, SelectorFn};
pub use selector::{
    SelectionFault, SelectionStep, check_choice, least_recent_fallback, round_robin_next,
    sequential_next,
};
