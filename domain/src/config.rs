//! Governance configuration types.
//!
//! A [`GovernanceConfig`] holds one [`ProposalTypeConfig`] per configured
//! proposal category (e.g. "policy", "moderator-change"). Each category owns
//! its debate, vote and resolutions destinations, the support threshold that
//! advances a proposal to a vote, the vote window, and the format labels the
//! classifier accepts.
//!
//! The configuration is loaded once at startup; a proposal copies its
//! threshold and window at vote-entry time, so later config edits never
//! affect a running vote.

use crate::core::ids::ChannelId;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration for a single proposal type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalTypeConfig {
    /// Type name, e.g. "policy".
    pub name: String,
    /// Channel where proposals of this type are debated.
    pub debate_channel: ChannelId,
    /// Channel where the time-boxed vote runs.
    pub vote_channel: ChannelId,
    /// Channel where passed proposals are published.
    pub resolutions_channel: ChannelId,
    /// Support reactions required to advance a proposal to a vote.
    pub support_threshold: u32,
    /// Length of the vote window, in seconds.
    pub vote_duration_secs: i64,
    /// Labels a proposal of this type may start with (e.g. "Policy" matches
    /// both `Policy: ...` and `**Policy**: ...`). The reserved "Withdraw"
    /// label is accepted for every type and must not be listed here.
    pub format_labels: Vec<String>,
}

impl ProposalTypeConfig {
    /// The vote window as a `chrono::Duration`.
    pub fn vote_duration(&self) -> Duration {
        Duration::seconds(self.vote_duration_secs)
    }
}

/// Static governance configuration for one guild.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Configured proposal types, in classification order.
    pub types: Vec<ProposalTypeConfig>,
}

impl GovernanceConfig {
    pub fn new(types: Vec<ProposalTypeConfig>) -> Self {
        Self { types }
    }

    /// Look up a proposal type by name.
    pub fn proposal_type(&self, name: &str) -> Option<&ProposalTypeConfig> {
        self.types.iter().find(|t| t.name == name)
    }
}
