//! Port definitions (interfaces to the outside world).
//!
//! Adapters live in the infrastructure layer; the real chat transport is
//! expected to implement [`chat_platform::ChatPlatform`] against the actual
//! messaging service.

pub mod audit_log;
pub mod chat_platform;
pub mod clock;
pub mod proposal_store;
