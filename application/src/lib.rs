//! Application layer for agora
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    audit_log::{AuditEvent, AuditLog, NoAuditLog},
    chat_platform::{ChannelMessage, ChatPlatform, PlatformError, ReactionCounts},
    clock::Clock,
    proposal_store::{ProposalPatch, ProposalStore, StoreError},
};
pub use use_cases::actor::{LifecycleCommand, LifecycleHandle};
pub use use_cases::lifecycle::{LifecycleError, VoteLifecycle};
pub use use_cases::resolve_withdrawal::{RESOLUTION_LOOKBACK, WithdrawalResolver};
pub use use_cases::scheduler::ExpiryScheduler;
