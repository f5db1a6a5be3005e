//! Error types for configuration loading

use thiserror::Error;

/// Errors that can occur while loading and merging configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One of the merged sources failed to parse or deserialize.
    #[error("Failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),
}

// Boxed: figment::Error is large and this enum travels in Results.
impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Load(Box::new(e))
    }
}
