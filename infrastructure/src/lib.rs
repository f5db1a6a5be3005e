//! Infrastructure layer for agora
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, including configuration file loading.

pub mod clock;
pub mod config;
pub mod logging;
pub mod platform;
pub mod store;

// Re-export commonly used types
pub use clock::SystemClock;
pub use config::{ConfigError, ConfigIssue, ConfigLoader, FileConfig, Severity};
pub use logging::JsonlAuditLogger;
pub use platform::InMemoryChatPlatform;
pub use store::InMemoryProposalStore;
