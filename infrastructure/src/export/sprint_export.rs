//! Sprint result export.
//!
//! Writes a [`SprintResult`] as pretty-printed JSON so runs can be
//! inspected or diffed after the fact. Field names come straight from the
//! domain types and are stable.

use standup_domain::SprintResult;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialize sprint result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Exporter for finished sprints
pub struct SprintExporter;

impl SprintExporter {
    /// Write the result to `path`, creating parent directories as needed.
    pub fn write(result: &SprintResult, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(result)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
