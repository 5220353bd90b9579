//! Structured run event logging adapters

mod jsonl_log;

pub use jsonl_log::JsonlEventLog;
