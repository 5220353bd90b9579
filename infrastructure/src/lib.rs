//! Infrastructure layer for standup
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration file loading, the JSONL run event
//! log, memory stores, the offline scripted provider, the builtin tool
//! registry, and sprint result export.

pub mod config;
pub mod export;
pub mod logging;
pub mod memory;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig, FileLogConfig, FileTurnConfig};
pub use export::{ExportError, SprintExporter};
pub use logging::JsonlEventLog;
pub use memory::{InMemoryStore, JsonFileStore};
pub use providers::ScriptedProvider;
pub use tools::ToolRegistry;
