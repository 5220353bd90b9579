//! Sprint domain: backlog, configuration, and the bounded development
//! cycle built from repeated orchestration runs.

pub mod backlog;
pub mod config;
pub mod entities;

pub use backlog::Backlog;
pub use config::SprintConfig;
pub use entities::{
    IterationRecord, Sprint, SprintPhase, SprintResult, SprintStatus, WorkItem, WorkItemStatus,
};
