//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use serde::{Deserialize, Serialize};
use standup_application::TurnParams;
use standup_domain::{DomainError, SprintConfig};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("turn.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error(transparent)]
    Sprint(#[from] DomainError),
}

/// Raw turn tuning from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTurnConfig {
    /// Wall-clock timeout for one turn attempt, in seconds
    pub timeout_seconds: u64,
    /// Retries after the first transient failure of a turn
    pub retry_budget: u32,
}

impl Default for FileTurnConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
            retry_budget: 2,
        }
    }
}

impl FileTurnConfig {
    pub fn turn_params(&self) -> TurnParams {
        TurnParams::default()
            .with_turn_timeout(Duration::from_secs(self.timeout_seconds))
            .with_retry_budget(self.retry_budget)
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// Where to append structured JSONL run events; absent disables them
    pub events_file: Option<PathBuf>,
}

/// Complete raw configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Sprint tuning, deserialized straight into the domain type
    pub sprint: SprintConfig,
    pub turn: FileTurnConfig,
    pub log: FileLogConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.turn.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        self.sprint.validate()?;
        Ok(())
    }
}
