//! Domain layer for agora
//!
//! This crate contains the governance entities and the pure decision logic:
//! proposal classification, vote tallying, withdrawal target matching, and
//! the rendering of vote/resolution messages. It has no dependencies on
//! infrastructure or transport concerns.
//!
//! # Core Concepts
//!
//! ## Proposal lifecycle
//!
//! A proposal starts as a plain message in a debate channel. Once it gathers
//! enough support reactions it becomes a time-boxed majority vote, and a
//! passed vote is published as a permanent **resolution**.
//!
//! ## Withdrawal
//!
//! A withdrawal is a proposal whose purpose is to revoke an earlier
//! resolution, referenced in free text and located by heuristic matching.

pub mod config;
pub mod core;
pub mod proposal;
pub mod render;
pub mod withdrawal;

// Re-export commonly used types
pub use config::{GovernanceConfig, ProposalTypeConfig};
pub use core::ids::{ChannelId, GuildId, MessageId, UserId};
pub use proposal::{
    classify::{Classification, classify, strip_labeled_prefix, WITHDRAW_LABEL},
    entities::{Proposal, ProposalStatus, TargetResolution, VoteCounts},
};
pub use withdrawal::matching::{
    MatchStrategy, extract_labeled_field, extract_withdrawal_target, keyword_overlap,
    match_resolution,
};
