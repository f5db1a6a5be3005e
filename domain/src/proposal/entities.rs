//! Proposal entity and vote state.
//!
//! A [`Proposal`] only exists as a record from the moment it enters
//! [`ProposalStatus::Voting`]; while debating it is nothing but a message
//! accumulating support reactions. Status transitions are monotonic:
//! `Debating → Voting → {Passed | Failed}`, and the terminal states are
//! immutable.

use crate::core::ids::{ChannelId, GuildId, MessageId, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Accumulating support reactions; not yet tracked in the store.
    Debating,
    /// Time-boxed vote in progress.
    Voting,
    /// Vote closed with a strict majority of yes votes. Terminal.
    Passed,
    /// Vote closed without a majority (ties fail). Terminal.
    Failed,
}

impl ProposalStatus {
    /// Check if the status is terminal (`Passed` or `Failed`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProposalStatus::Passed | ProposalStatus::Failed)
    }

    /// Check if a vote is currently open.
    pub fn is_voting(&self) -> bool {
        matches!(self, ProposalStatus::Voting)
    }

    /// Whether `self → next` is a legal forward transition.
    pub fn can_transition_to(&self, next: ProposalStatus) -> bool {
        matches!(
            (self, next),
            (ProposalStatus::Debating, ProposalStatus::Voting)
                | (ProposalStatus::Voting, ProposalStatus::Passed)
                | (ProposalStatus::Voting, ProposalStatus::Failed)
        )
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalStatus::Debating => write!(f, "Debating"),
            ProposalStatus::Voting => write!(f, "Voting"),
            ProposalStatus::Passed => write!(f, "Passed"),
            ProposalStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Yes/no tallies for a vote.
///
/// Always recomputed from a live reaction snapshot, never incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    pub yes: u32,
    pub no: u32,
}

impl VoteCounts {
    pub fn new(yes: u32, no: u32) -> Self {
        Self { yes, no }
    }

    /// Build tallies from raw reaction counts on the vote message.
    ///
    /// The engine seeds one reaction per option when it opens the vote, so
    /// one is subtracted from each raw count, floored at zero.
    pub fn from_reaction_snapshot(raw_yes: u32, raw_no: u32) -> Self {
        Self {
            yes: raw_yes.saturating_sub(1),
            no: raw_no.saturating_sub(1),
        }
    }

    /// Outcome rule: a strict majority of yes votes passes; a tie fails.
    pub fn passed(&self) -> bool {
        self.yes > self.no
    }
}

/// The prior resolution a withdrawal proposal seeks to revoke.
///
/// Resolved once, when the withdrawal enters `Voting`, and never re-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResolution {
    /// Message id of the published resolution record.
    pub resolution_id: MessageId,
    /// Channel the resolution record lives in.
    pub channel_id: ChannelId,
    /// Full rendered text of the resolution record.
    pub raw_content: String,
    /// The original proposal text extracted from the record's labeled field
    /// (falls back to the full text when no label is found).
    pub original_text: String,
}

/// A tracked proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Id of the originating debate message; the store key within a guild.
    pub id: MessageId,
    /// Owning community.
    pub guild_id: GuildId,
    /// Proposal type name, e.g. "policy".
    pub kind: String,
    /// True if this proposal seeks to revoke a prior resolution.
    pub is_withdrawal: bool,
    /// Original proposal text as posted in the debate channel.
    pub content: String,
    /// Submitting member.
    pub author_id: UserId,
    /// Current lifecycle status.
    pub status: ProposalStatus,
    /// Threshold copied from the type config at vote-entry time.
    pub support_threshold: u32,
    /// Latest tallies, recomputed from reaction snapshots.
    pub vote_counts: VoteCounts,
    /// When the vote opened.
    pub start_time: DateTime<Utc>,
    /// `start_time + vote_duration`, fixed at vote-entry time.
    pub end_time: DateTime<Utc>,
    /// When the vote was finalized.
    pub completed_at: Option<DateTime<Utc>>,
    /// Message the vote runs on.
    pub vote_message_id: MessageId,
    /// Channel the vote runs in.
    pub vote_channel: ChannelId,
    /// Withdrawal target, present iff `is_withdrawal`.
    pub target_resolution: Option<TargetResolution>,
}

impl Proposal {
    /// Create a proposal entering `Voting` now.
    #[allow(clippy::too_many_arguments)]
    pub fn open_vote(
        id: MessageId,
        guild_id: GuildId,
        kind: impl Into<String>,
        content: impl Into<String>,
        author_id: UserId,
        support_threshold: u32,
        now: DateTime<Utc>,
        vote_duration: Duration,
        vote_message_id: MessageId,
        vote_channel: ChannelId,
    ) -> Self {
        Self {
            id,
            guild_id,
            kind: kind.into(),
            is_withdrawal: false,
            content: content.into(),
            author_id,
            status: ProposalStatus::Voting,
            support_threshold,
            vote_counts: VoteCounts::default(),
            start_time: now,
            end_time: now + vote_duration,
            completed_at: None,
            vote_message_id,
            vote_channel,
            target_resolution: None,
        }
    }

    /// Mark this proposal as a withdrawal of the given resolution.
    pub fn withdrawing(mut self, target: TargetResolution) -> Self {
        self.is_withdrawal = true;
        self.target_resolution = Some(target);
        self
    }

    /// Whether the vote window has elapsed at `now`.
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_time
    }
}
