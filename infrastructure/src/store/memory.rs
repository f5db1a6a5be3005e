//! In-memory proposal store.
//!
//! The reference [`ProposalStore`] adapter: nested guild → proposal maps
//! behind a single `tokio::sync::RwLock`. Conditional create and the
//! `expected_status` gate are evaluated under the write lock, which is what
//! makes them atomic.

use agora_application::ports::proposal_store::{ProposalPatch, ProposalStore, StoreError};
use agora_domain::{GuildId, MessageId, Proposal, ProposalStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

type GuildRecords = HashMap<String, Proposal>;

/// Proposal store backed by process memory. State is lost on restart.
#[derive(Default)]
pub struct InMemoryProposalStore {
    guilds: RwLock<HashMap<String, GuildRecords>>,
}

impl InMemoryProposalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProposalStore for InMemoryProposalStore {
    async fn create(&self, proposal: Proposal) -> Result<(), StoreError> {
        let mut guilds = self.guilds.write().await;
        let records = guilds
            .entry(proposal.guild_id.as_str().to_string())
            .or_default();
        let key = proposal.id.as_str().to_string();
        if records.contains_key(&key) {
            return Err(StoreError::AlreadyExists(proposal.id));
        }
        records.insert(key, proposal);
        Ok(())
    }

    async fn get(
        &self,
        guild: &GuildId,
        id: &MessageId,
    ) -> Result<Option<Proposal>, StoreError> {
        let guilds = self.guilds.read().await;
        Ok(guilds
            .get(guild.as_str())
            .and_then(|records| records.get(id.as_str()))
            .cloned())
    }

    async fn update(
        &self,
        guild: &GuildId,
        id: &MessageId,
        patch: ProposalPatch,
    ) -> Result<Proposal, StoreError> {
        let mut guilds = self.guilds.write().await;
        let record = guilds
            .get_mut(guild.as_str())
            .and_then(|records| records.get_mut(id.as_str()))
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if let Some(expected) = patch.expected_status
            && record.status != expected
        {
            return Err(StoreError::Conflict(id.clone()));
        }

        patch.apply(record);
        Ok(record.clone())
    }

    async fn query_by_status(
        &self,
        guild: &GuildId,
        status: ProposalStatus,
    ) -> Result<Vec<Proposal>, StoreError> {
        let guilds = self.guilds.read().await;
        Ok(guilds
            .get(guild.as_str())
            .map(|records| {
                records
                    .values()
                    .filter(|p| p.status == status)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_by_type(
        &self,
        guild: &GuildId,
        kind: &str,
    ) -> Result<Vec<Proposal>, StoreError> {
        let guilds = self.guilds.read().await;
        Ok(guilds
            .get(guild.as_str())
            .map(|records| {
                records
                    .values()
                    .filter(|p| p.kind == kind)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_domain::{ChannelId, UserId, VoteCounts};
    use chrono::{Duration, Utc};

    fn proposal(guild: &str, id: &str) -> Proposal {
        Proposal::open_vote(
            MessageId::new(id),
            GuildId::new(guild),
            "policy",
            "**Policy**: Ban spam bots",
            UserId::new("alice"),
            3,
            Utc::now(),
            Duration::hours(24),
            MessageId::new(format!("v-{id}")),
            ChannelId::new("votes"),
        )
    }

    #[tokio::test]
    async fn test_create_is_conditional() {
        let store = InMemoryProposalStore::new();
        store.create(proposal("g1", "m1")).await.unwrap();

        let err = store.create(proposal("g1", "m1")).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));

        // Same id under another guild is a distinct record.
        store.create(proposal("g2", "m1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_honors_expected_status() {
        let store = InMemoryProposalStore::new();
        let guild = GuildId::new("g1");
        let id = MessageId::new("m1");
        store.create(proposal("g1", "m1")).await.unwrap();

        let finalized = store
            .update(
                &guild,
                &id,
                ProposalPatch::finalize(ProposalStatus::Passed, VoteCounts::new(6, 2), Utc::now()),
            )
            .await
            .unwrap();
        assert_eq!(finalized.status, ProposalStatus::Passed);
        assert!(finalized.completed_at.is_some());

        // A second conditional finalize loses the status gate.
        let err = store
            .update(
                &guild,
                &id,
                ProposalPatch::finalize(ProposalStatus::Failed, VoteCounts::new(6, 2), Utc::now()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(
            store.get(&guild, &id).await.unwrap().unwrap().status,
            ProposalStatus::Passed
        );
    }

    #[tokio::test]
    async fn test_unconditional_count_refresh_always_applies() {
        let store = InMemoryProposalStore::new();
        let guild = GuildId::new("g1");
        let id = MessageId::new("m1");
        store.create(proposal("g1", "m1")).await.unwrap();

        let updated = store
            .update(&guild, &id, ProposalPatch::counts(VoteCounts::new(4, 1)))
            .await
            .unwrap();
        assert_eq!(updated.vote_counts, VoteCounts::new(4, 1));
        assert_eq!(updated.status, ProposalStatus::Voting);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = InMemoryProposalStore::new();
        let err = store
            .update(
                &GuildId::new("g1"),
                &MessageId::new("missing"),
                ProposalPatch::counts(VoteCounts::new(1, 0)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_queries_are_guild_scoped() {
        let store = InMemoryProposalStore::new();
        store.create(proposal("g1", "m1")).await.unwrap();
        store.create(proposal("g1", "m2")).await.unwrap();
        store.create(proposal("g2", "m3")).await.unwrap();

        let voting = store
            .query_by_status(&GuildId::new("g1"), ProposalStatus::Voting)
            .await
            .unwrap();
        assert_eq!(voting.len(), 2);

        let policies = store
            .query_by_type(&GuildId::new("g2"), "policy")
            .await
            .unwrap();
        assert_eq!(policies.len(), 1);

        let none = store
            .query_by_type(&GuildId::new("g3"), "policy")
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
