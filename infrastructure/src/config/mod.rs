//! Configuration file loading for agora
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./agora.toml` or `./.agora.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/agora/config.toml`
//! 4. Fallback: `~/.config/agora/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    ConfigIssue, FileAuditConfig, FileConfig, FileGuildConfig, FileProposalTypeConfig,
    FileSchedulerConfig, Severity,
};
pub use loader::ConfigLoader;
