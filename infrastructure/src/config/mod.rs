//! Configuration file loading for standup
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./standup.toml` or `./.standup.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/standup/config.toml`
//! 4. Fallback: `~/.config/standup/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigValidationError, FileConfig, FileLogConfig, FileTurnConfig};
pub use loader::ConfigLoader;
