//! Proposal store port.
//!
//! Key-value persistence for tracked proposals with conditional writes and
//! secondary lookups. The conditional-create and conditional-update
//! semantics are the engine's only concurrency safeguard: they make
//! "first writer wins" atomic at the store layer.

use agora_domain::{GuildId, MessageId, Proposal, ProposalStatus, VoteCounts};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Conditional create failed: a record with this id already exists.
    #[error("Proposal already exists: {0}")]
    AlreadyExists(MessageId),

    #[error("Proposal not found: {0}")]
    NotFound(MessageId),

    /// Conditional update failed: the record's status did not match
    /// `expected_status`. Someone else already handled this proposal.
    #[error("Conditional update conflict on proposal {0}")]
    Conflict(MessageId),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A partial update to a tracked proposal.
///
/// Only the populated fields are written. When `expected_status` is set the
/// update applies only if the stored status still matches, failing with
/// [`StoreError::Conflict`] otherwise.
#[derive(Debug, Clone, Default)]
pub struct ProposalPatch {
    pub status: Option<ProposalStatus>,
    pub vote_counts: Option<VoteCounts>,
    pub completed_at: Option<DateTime<Utc>>,
    pub expected_status: Option<ProposalStatus>,
}

impl ProposalPatch {
    /// Refresh the live tallies only.
    pub fn counts(counts: VoteCounts) -> Self {
        Self {
            vote_counts: Some(counts),
            ..Self::default()
        }
    }

    /// Move a proposal from `Voting` to a terminal status, conditionally on
    /// it still being `Voting`.
    pub fn finalize(status: ProposalStatus, counts: VoteCounts, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            vote_counts: Some(counts),
            completed_at: Some(at),
            expected_status: Some(ProposalStatus::Voting),
        }
    }

    /// Apply this patch to a proposal record. Callers are responsible for
    /// checking `expected_status` first.
    pub fn apply(&self, proposal: &mut Proposal) {
        if let Some(status) = self.status {
            proposal.status = status;
        }
        if let Some(counts) = self.vote_counts {
            proposal.vote_counts = counts;
        }
        if let Some(at) = self.completed_at {
            proposal.completed_at = Some(at);
        }
    }
}

/// Port for proposal persistence. All operations are scoped by guild;
/// records never leak across guilds.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Create a new record, failing with [`StoreError::AlreadyExists`] if
    /// the id is already tracked (conditional create).
    async fn create(&self, proposal: Proposal) -> Result<(), StoreError>;

    /// Fetch a record by id.
    async fn get(
        &self,
        guild: &GuildId,
        id: &MessageId,
    ) -> Result<Option<Proposal>, StoreError>;

    /// Apply a partial update, failing with [`StoreError::NotFound`] if the
    /// record does not exist and [`StoreError::Conflict`] if an expected
    /// status does not match. Returns the updated record.
    async fn update(
        &self,
        guild: &GuildId,
        id: &MessageId,
        patch: ProposalPatch,
    ) -> Result<Proposal, StoreError>;

    /// All records with the given status.
    async fn query_by_status(
        &self,
        guild: &GuildId,
        status: ProposalStatus,
    ) -> Result<Vec<Proposal>, StoreError>;

    /// All records of the given proposal type.
    async fn query_by_type(
        &self,
        guild: &GuildId,
        kind: &str,
    ) -> Result<Vec<Proposal>, StoreError>;
}
