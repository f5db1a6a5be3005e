//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod actor;
pub mod lifecycle;
pub mod resolve_withdrawal;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod fixtures;
