//! Vote lifecycle coordinator.
//!
//! The core orchestrator of the governance engine: advances proposals from
//! debate to vote when they cross their support threshold, keeps tallies
//! fresh, finalizes votes whose window has elapsed, publishes resolutions
//! for passed proposals, and executes passed withdrawals.
//!
//! No error here is fatal. Operations abort at their own boundary with a
//! log entry; the next reaction event or scheduler tick is the retry
//! mechanism. Store conflicts mean another event already did the work and
//! are dropped silently (debug-logged).

use crate::ports::audit_log::{AuditEvent, AuditLog, NoAuditLog};
use crate::ports::chat_platform::{ChannelMessage, ChatPlatform, PlatformError, ReactionCounts};
use crate::ports::clock::Clock;
use crate::ports::proposal_store::{ProposalPatch, ProposalStore, StoreError};
use crate::use_cases::resolve_withdrawal::WithdrawalResolver;
use agora_domain::{
    Classification, GovernanceConfig, GuildId, MessageId, Proposal, ProposalStatus, VoteCounts,
    classify, render,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that can occur during lifecycle operations.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// A configured destination does not exist on the platform.
    #[error("Destination channel missing: {0}")]
    MissingDestination(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Coordinator for the proposal and vote lifecycle of one guild.
pub struct VoteLifecycle {
    platform: Arc<dyn ChatPlatform>,
    store: Arc<dyn ProposalStore>,
    clock: Arc<dyn Clock>,
    audit: Arc<dyn AuditLog>,
    resolver: WithdrawalResolver,
    guild: GuildId,
    config: GovernanceConfig,
}

impl VoteLifecycle {
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        store: Arc<dyn ProposalStore>,
        clock: Arc<dyn Clock>,
        guild: GuildId,
        config: GovernanceConfig,
    ) -> Self {
        let resolver = WithdrawalResolver::new(Arc::clone(&platform));
        Self {
            platform,
            store,
            clock,
            audit: Arc::new(NoAuditLog),
            resolver,
            guild,
            config,
        }
    }

    /// Attach an audit log.
    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    /// React to a change in support reactions on a debate-channel message.
    ///
    /// Idempotent: a message that is already tracked is ignored, whatever
    /// the reaction count says. Otherwise the message is classified and, if
    /// its support has reached the type's threshold, moved to a vote.
    pub async fn handle_support_reaction(
        &self,
        message: &ChannelMessage,
        support_count: u32,
    ) -> Result<(), LifecycleError> {
        if self.store.get(&self.guild, &message.id).await?.is_some() {
            debug!(proposal = %message.id, "already tracked; ignoring support event");
            return Ok(());
        }

        let Some(classification) = classify(&self.config, &message.channel_id, &message.content)
        else {
            return Ok(());
        };

        if support_count < classification.config.support_threshold {
            debug!(
                proposal = %message.id,
                support_count,
                threshold = classification.config.support_threshold,
                "support below threshold"
            );
            return Ok(());
        }

        self.move_to_vote(message, &classification).await
    }

    /// Advance a debate-channel proposal into a time-boxed vote.
    async fn move_to_vote(
        &self,
        message: &ChannelMessage,
        classification: &Classification<'_>,
    ) -> Result<(), LifecycleError> {
        let cfg = classification.config;

        // A withdrawal must have a resolved target before it may enter
        // Voting; otherwise it is rejected and never tracked.
        let target = if classification.is_withdrawal {
            match self.resolver.resolve(&message.content, cfg).await? {
                Some(target) => Some(target),
                None => {
                    warn!(
                        proposal = %message.id,
                        "withdrawal references no locatable resolution; rejecting"
                    );
                    self.audit.record(AuditEvent::new(
                        "withdrawal_rejected",
                        json!({
                            "guild": self.guild.as_str(),
                            "message": message.id.as_str(),
                            "author": message.author_id.as_str(),
                        }),
                    ));
                    let notice =
                        render::withdrawal_rejected_notice(message.author_id.as_str());
                    if let Err(e) = self
                        .platform
                        .send_message(&message.channel_id, &notice)
                        .await
                    {
                        warn!(error = %e, "could not notify proposer of rejected withdrawal");
                    }
                    return Ok(());
                }
            }
        } else {
            None
        };

        let now = self.clock.now();
        let end_time = now + cfg.vote_duration();
        let body = render::vote_message(&message.content, message.author_id.as_str(), end_time);

        let vote_message_id = match self.platform.send_message(&cfg.vote_channel, &body).await {
            Ok(id) => id,
            Err(PlatformError::ChannelNotFound(channel)) => {
                error!(%channel, kind = classification.kind, "vote channel missing; aborting");
                return Err(LifecycleError::MissingDestination(channel.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        self.platform
            .add_reaction(&cfg.vote_channel, &vote_message_id, render::YES_OPTION)
            .await?;
        self.platform
            .add_reaction(&cfg.vote_channel, &vote_message_id, render::NO_OPTION)
            .await?;

        let mut proposal = Proposal::open_vote(
            message.id.clone(),
            self.guild.clone(),
            classification.kind,
            &message.content,
            message.author_id.clone(),
            cfg.support_threshold,
            now,
            cfg.vote_duration(),
            vote_message_id.clone(),
            cfg.vote_channel.clone(),
        );
        if let Some(target) = target {
            proposal = proposal.withdrawing(target);
        }

        match self.store.create(proposal).await {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(_)) => {
                // A concurrent event won the race; drop ours and clean up
                // the duplicate vote message.
                debug!(proposal = %message.id, "lost creation race; dropping");
                if let Err(e) = self
                    .platform
                    .delete_message(&cfg.vote_channel, &vote_message_id)
                    .await
                {
                    warn!(error = %e, "could not delete duplicate vote message");
                }
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            proposal = %message.id,
            kind = classification.kind,
            is_withdrawal = classification.is_withdrawal,
            %end_time,
            "proposal moved to vote"
        );
        self.audit.record(AuditEvent::new(
            "vote_opened",
            json!({
                "guild": self.guild.as_str(),
                "proposal": message.id.as_str(),
                "kind": classification.kind,
                "is_withdrawal": classification.is_withdrawal,
                "vote_message": vote_message_id.as_str(),
                "end_time": end_time.to_rfc3339(),
            }),
        ));

        // Best-effort: mark the debate message as moved.
        let moved = render::debate_moved_notice(&message.content);
        if let Err(e) = self
            .platform
            .edit_message(&message.channel_id, &message.id, &moved)
            .await
        {
            warn!(error = %e, "could not mark debate message as moved");
        }

        Ok(())
    }

    /// Recompute tallies from a reaction snapshot and persist them.
    ///
    /// One reaction per option is the engine's own seed and excluded.
    pub async fn update_vote_counts(
        &self,
        proposal: &Proposal,
        snapshot: &ReactionCounts,
    ) -> Result<VoteCounts, LifecycleError> {
        let counts = VoteCounts::from_reaction_snapshot(
            snapshot.count(render::YES_OPTION),
            snapshot.count(render::NO_OPTION),
        );
        self.store
            .update(&self.guild, &proposal.id, ProposalPatch::counts(counts))
            .await?;
        self.audit.record(AuditEvent::new(
            "vote_counts_updated",
            json!({
                "guild": self.guild.as_str(),
                "proposal": proposal.id.as_str(),
                "yes": counts.yes,
                "no": counts.no,
            }),
        ));
        Ok(counts)
    }

    /// Best-effort live tally refresh for a reaction change on an open vote
    /// message. Unknown messages are ignored.
    pub async fn handle_vote_reaction(
        &self,
        vote_message_id: &MessageId,
    ) -> Result<(), LifecycleError> {
        let voting = self
            .store
            .query_by_status(&self.guild, ProposalStatus::Voting)
            .await?;
        let Some(proposal) = voting
            .into_iter()
            .find(|p| p.vote_message_id == *vote_message_id)
        else {
            return Ok(());
        };

        let snapshot = self
            .platform
            .reaction_counts(&proposal.vote_channel, &proposal.vote_message_id)
            .await?;
        self.update_vote_counts(&proposal, &snapshot).await?;
        Ok(())
    }

    /// Finalize every open vote whose window has elapsed.
    ///
    /// One proposal's failure never blocks the others; each is isolated and
    /// retried on the next tick, since the due-set is re-derived from
    /// scratch every time.
    pub async fn check_ended_votes(&self) -> Result<(), LifecycleError> {
        let voting = self
            .store
            .query_by_status(&self.guild, ProposalStatus::Voting)
            .await?;
        let now = self.clock.now();

        for proposal in voting.into_iter().filter(|p| p.has_expired(now)) {
            if let Err(e) = self.process_ended_vote(&proposal).await {
                error!(proposal = %proposal.id, error = %e, "failed to finalize ended vote");
            }
        }

        Ok(())
    }

    /// Finalize one ended vote: authoritative tally, terminal status,
    /// outcome summary, and the passed-proposal side effects.
    pub async fn process_ended_vote(&self, proposal: &Proposal) -> Result<(), LifecycleError> {
        let vote_message = self
            .platform
            .fetch_message(&proposal.vote_channel, &proposal.vote_message_id)
            .await?;
        let snapshot = self
            .platform
            .reaction_counts(&proposal.vote_channel, &proposal.vote_message_id)
            .await?;

        // Persisted only by the status-gated finalize below, so a stale
        // invocation cannot touch the tally of an already-terminal record.
        let counts = VoteCounts::from_reaction_snapshot(
            snapshot.count(render::YES_OPTION),
            snapshot.count(render::NO_OPTION),
        );
        let passed = counts.passed();
        let status = if passed {
            ProposalStatus::Passed
        } else {
            ProposalStatus::Failed
        };
        let completed_at = self.clock.now();

        let finalized = match self
            .store
            .update(
                &self.guild,
                &proposal.id,
                ProposalPatch::finalize(status, counts, completed_at),
            )
            .await
        {
            Ok(p) => p,
            Err(StoreError::Conflict(_)) => {
                debug!(proposal = %proposal.id, "already finalized; dropping");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            proposal = %proposal.id,
            %status,
            yes = counts.yes,
            no = counts.no,
            "vote finalized"
        );
        self.audit.record(AuditEvent::new(
            "vote_finalized",
            json!({
                "guild": self.guild.as_str(),
                "proposal": proposal.id.as_str(),
                "status": status.to_string(),
                "yes": counts.yes,
                "no": counts.no,
            }),
        ));

        // Best-effort: append the outcome summary to the vote message.
        let summary = format!(
            "{}{}",
            vote_message.content,
            render::vote_outcome(passed, counts)
        );
        if let Err(e) = self
            .platform
            .edit_message(&proposal.vote_channel, &proposal.vote_message_id, &summary)
            .await
        {
            warn!(error = %e, "could not append vote outcome");
        }

        if passed {
            if finalized.is_withdrawal {
                self.execute_withdrawal(&finalized).await;
            } else {
                self.move_to_resolutions(&finalized).await;
            }
        }

        Ok(())
    }

    /// Publish the permanent resolution record for a passed proposal.
    ///
    /// A missing destination is logged and aborts without error.
    async fn move_to_resolutions(&self, proposal: &Proposal) {
        let Some(cfg) = self.config.proposal_type(&proposal.kind) else {
            error!(
                kind = %proposal.kind,
                "proposal type no longer configured; cannot publish resolution"
            );
            return;
        };

        let completed_at = proposal.completed_at.unwrap_or_else(|| self.clock.now());
        let record = render::resolution_record(proposal, completed_at);

        match self
            .platform
            .send_message(&cfg.resolutions_channel, &record)
            .await
        {
            Ok(resolution_id) => {
                info!(proposal = %proposal.id, %resolution_id, "resolution published");
                self.audit.record(AuditEvent::new(
                    "resolution_published",
                    json!({
                        "guild": self.guild.as_str(),
                        "proposal": proposal.id.as_str(),
                        "resolution": resolution_id.as_str(),
                    }),
                ));
            }
            Err(e) => {
                error!(proposal = %proposal.id, error = %e, "could not publish resolution");
            }
        }
    }

    /// Execute a passed withdrawal: remove the target resolution record and
    /// post the withdrawal notice.
    async fn execute_withdrawal(&self, proposal: &Proposal) {
        let Some(target) = proposal.target_resolution.as_ref() else {
            // Invariant: withdrawals never reach Voting without a target.
            error!(proposal = %proposal.id, "passed withdrawal has no target; skipping");
            return;
        };

        if let Err(e) = self
            .platform
            .delete_message(&target.channel_id, &target.resolution_id)
            .await
        {
            warn!(
                resolution = %target.resolution_id,
                error = %e,
                "could not delete withdrawn resolution record"
            );
        }

        let notice = render::withdrawal_notice(target, proposal.vote_counts);
        match self
            .platform
            .send_message(&target.channel_id, &notice)
            .await
        {
            Ok(_) => {
                info!(
                    proposal = %proposal.id,
                    resolution = %target.resolution_id,
                    "resolution withdrawn"
                );
                self.audit.record(AuditEvent::new(
                    "resolution_withdrawn",
                    json!({
                        "guild": self.guild.as_str(),
                        "proposal": proposal.id.as_str(),
                        "resolution": target.resolution_id.as_str(),
                    }),
                ));
            }
            Err(e) => {
                error!(proposal = %proposal.id, error = %e, "could not post withdrawal notice");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::fixtures::{
        FixedClock, MemPlatform, MemStore, SPAM_RESOLUTION, engine, fixture,
    };
    use chrono::Duration;

    /// Open a vote for a fresh policy proposal and return its store record.
    async fn open_policy_vote(
        platform: &Arc<MemPlatform>,
        store: &Arc<MemStore>,
        lifecycle: &VoteLifecycle,
        text: &str,
    ) -> Proposal {
        let message = platform.post("debate", "alice", text);
        lifecycle
            .handle_support_reaction(&message, 3)
            .await
            .unwrap();
        store.record(message.id.as_str()).expect("tracked")
    }

    // ==================== handle_support_reaction ====================

    #[tokio::test]
    async fn test_threshold_crossing_opens_exactly_one_vote() {
        let (platform, store, clock, lifecycle) = fixture();
        let message = platform.post("debate", "alice", "**Policy**: Ban spam bots");

        lifecycle
            .handle_support_reaction(&message, 3)
            .await
            .unwrap();

        let votes = platform.contents_of("votes");
        assert_eq!(votes.len(), 1);
        assert!(votes[0].contains("**Policy**: Ban spam bots"));

        let proposal = store.record(message.id.as_str()).expect("tracked");
        assert_eq!(proposal.status, ProposalStatus::Voting);
        assert_eq!(proposal.support_threshold, 3);
        assert_eq!(proposal.end_time, clock.now() + Duration::hours(1));
        assert_eq!(proposal.vote_counts, VoteCounts::default());

        // Both vote options were seeded on the vote message.
        let snapshot = platform
            .reaction_counts(&proposal.vote_channel, &proposal.vote_message_id)
            .await
            .unwrap();
        assert_eq!(snapshot.count(render::YES_OPTION), 1);
        assert_eq!(snapshot.count(render::NO_OPTION), 1);

        // The debate message was marked as moved.
        let debate = platform.contents_of("debate");
        assert!(debate[0].contains("moved to a vote"));

        // A duplicate threshold event is a no-op.
        lifecycle
            .handle_support_reaction(&message, 5)
            .await
            .unwrap();
        assert_eq!(platform.contents_of("votes").len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_below_threshold_is_ignored() {
        let (platform, store, _clock, lifecycle) = fixture();
        let message = platform.post("debate", "alice", "**Policy**: Ban spam bots");

        lifecycle
            .handle_support_reaction(&message, 2)
            .await
            .unwrap();

        assert!(platform.contents_of("votes").is_empty());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_non_proposal_message_is_ignored() {
        let (platform, store, _clock, lifecycle) = fixture();
        let message = platform.post("debate", "alice", "what about banning spam bots?");

        lifecycle
            .handle_support_reaction(&message, 10)
            .await
            .unwrap();

        assert!(platform.contents_of("votes").is_empty());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_lost_create_race_leaves_no_duplicate() {
        let platform = MemPlatform::with_channels(&["debate", "votes", "resolutions"]);
        let store = MemStore::always_conflicting();
        let clock = FixedClock::starting();
        let lifecycle = engine(&platform, &store, &clock);

        let message = platform.post("debate", "alice", "**Policy**: Ban spam bots");
        lifecycle
            .handle_support_reaction(&message, 3)
            .await
            .unwrap();

        // The losing side deleted its vote message and tracked nothing.
        assert!(platform.contents_of("votes").is_empty());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_missing_vote_channel_aborts_without_state() {
        let platform = MemPlatform::with_channels(&["debate", "resolutions"]);
        let store = MemStore::new();
        let clock = FixedClock::starting();
        let lifecycle = engine(&platform, &store, &clock);

        let message = platform.post("debate", "alice", "**Policy**: Ban spam bots");
        let result = lifecycle.handle_support_reaction(&message, 3).await;

        assert!(matches!(result, Err(LifecycleError::MissingDestination(_))));
        assert_eq!(store.len(), 0);
    }

    // ==================== finalization ====================

    #[tokio::test]
    async fn test_passed_vote_publishes_resolution() {
        let (platform, store, clock, lifecycle) = fixture();
        let proposal =
            open_policy_vote(&platform, &store, &lifecycle, "**Policy**: Ban spam bots").await;

        // 6 yes, 2 no on top of the seed reactions.
        platform.react("votes", &proposal.vote_message_id, render::YES_OPTION, 6);
        platform.react("votes", &proposal.vote_message_id, render::NO_OPTION, 2);

        clock.advance(Duration::hours(2));
        lifecycle.check_ended_votes().await.unwrap();

        let finalized = store.record(proposal.id.as_str()).unwrap();
        assert_eq!(finalized.status, ProposalStatus::Passed);
        assert_eq!(finalized.vote_counts, VoteCounts::new(6, 2));
        assert!(finalized.completed_at.is_some());

        let resolutions = platform.contents_of("resolutions");
        assert_eq!(resolutions.len(), 1);
        assert!(resolutions[0].contains("✅ 6 - ❌ 2"));
        assert!(resolutions[0].contains("**Policy**: Ban spam bots"));
        assert!(render::is_published_resolution(&resolutions[0]));

        // Outcome summary appended to the vote message.
        let votes = platform.contents_of("votes");
        assert!(votes[0].contains("✅ Passed"));
    }

    #[tokio::test]
    async fn test_tie_fails_and_publishes_nothing() {
        let (platform, store, clock, lifecycle) = fixture();
        let proposal =
            open_policy_vote(&platform, &store, &lifecycle, "**Policy**: Ban spam bots").await;

        platform.react("votes", &proposal.vote_message_id, render::YES_OPTION, 4);
        platform.react("votes", &proposal.vote_message_id, render::NO_OPTION, 4);

        clock.advance(Duration::hours(2));
        lifecycle.check_ended_votes().await.unwrap();

        let finalized = store.record(proposal.id.as_str()).unwrap();
        assert_eq!(finalized.status, ProposalStatus::Failed);
        assert!(platform.contents_of("resolutions").is_empty());
        assert!(platform.contents_of("votes")[0].contains("❌ Failed"));
    }

    #[tokio::test]
    async fn test_open_votes_are_left_alone() {
        let (platform, store, _clock, lifecycle) = fixture();
        let proposal =
            open_policy_vote(&platform, &store, &lifecycle, "**Policy**: Ban spam bots").await;

        // Window has not elapsed.
        lifecycle.check_ended_votes().await.unwrap();

        let record = store.record(proposal.id.as_str()).unwrap();
        assert_eq!(record.status, ProposalStatus::Voting);
    }

    #[tokio::test]
    async fn test_transport_failure_is_isolated_per_proposal() {
        let (platform, store, clock, lifecycle) = fixture();
        let failing =
            open_policy_vote(&platform, &store, &lifecycle, "**Policy**: Ban spam bots").await;
        let healthy =
            open_policy_vote(&platform, &store, &lifecycle, "**Policy**: Weekly digest").await;

        platform.fail_fetch_of(&failing.vote_message_id);
        platform.react("votes", &healthy.vote_message_id, render::YES_OPTION, 3);

        clock.advance(Duration::hours(2));
        lifecycle.check_ended_votes().await.unwrap();

        // The failing proposal stays open for the next tick; the healthy
        // one is finalized regardless.
        assert_eq!(
            store.record(failing.id.as_str()).unwrap().status,
            ProposalStatus::Voting
        );
        assert_eq!(
            store.record(healthy.id.as_str()).unwrap().status,
            ProposalStatus::Passed
        );
    }

    #[tokio::test]
    async fn test_terminal_status_is_immutable_via_conditional_update() {
        let (platform, store, clock, lifecycle) = fixture();
        let proposal =
            open_policy_vote(&platform, &store, &lifecycle, "**Policy**: Ban spam bots").await;

        platform.react("votes", &proposal.vote_message_id, render::YES_OPTION, 3);
        clock.advance(Duration::hours(2));
        lifecycle.check_ended_votes().await.unwrap();
        assert_eq!(
            store.record(proposal.id.as_str()).unwrap().status,
            ProposalStatus::Passed
        );

        // Finalizing again conflicts on the status gate and drops cleanly.
        let finalized = store.record(proposal.id.as_str()).unwrap();
        lifecycle.process_ended_vote(&finalized).await.unwrap();
        assert_eq!(
            store.record(proposal.id.as_str()).unwrap().status,
            ProposalStatus::Passed
        );
        // No second resolution was published.
        assert_eq!(platform.contents_of("resolutions").len(), 1);
    }

    #[tokio::test]
    async fn test_stale_finalize_does_not_rewrite_terminal_counts() {
        let (platform, store, clock, lifecycle) = fixture();
        let proposal =
            open_policy_vote(&platform, &store, &lifecycle, "**Policy**: Ban spam bots").await;

        platform.react("votes", &proposal.vote_message_id, render::YES_OPTION, 3);
        clock.advance(Duration::hours(2));
        lifecycle.check_ended_votes().await.unwrap();
        assert_eq!(
            store.record(proposal.id.as_str()).unwrap().vote_counts,
            VoteCounts::new(3, 0)
        );

        // Reactions keep drifting after the vote closed; finalizing the
        // stale record again must leave the stored tally untouched.
        platform.react("votes", &proposal.vote_message_id, render::NO_OPTION, 5);
        let finalized = store.record(proposal.id.as_str()).unwrap();
        lifecycle.process_ended_vote(&finalized).await.unwrap();

        let record = store.record(proposal.id.as_str()).unwrap();
        assert_eq!(record.status, ProposalStatus::Passed);
        assert_eq!(record.vote_counts, VoteCounts::new(3, 0));
    }

    // ==================== withdrawals ====================

    #[tokio::test]
    async fn test_withdrawal_without_target_is_never_tracked() {
        let (platform, store, _clock, lifecycle) = fixture();
        let message = platform.post("debate", "alice", "**Withdraw**: Ban spam bots");

        lifecycle
            .handle_support_reaction(&message, 3)
            .await
            .unwrap();

        assert_eq!(store.len(), 0);
        assert!(platform.contents_of("votes").is_empty());
        // The proposer was notified in the debate channel.
        let debate = platform.contents_of("debate");
        assert!(debate.iter().any(|m| m.contains("no matching published resolution")));
    }

    #[tokio::test]
    async fn test_passed_withdrawal_removes_target_resolution() {
        let (platform, store, clock, lifecycle) = fixture();
        let resolution = platform.post("resolutions", "agora", SPAM_RESOLUTION);

        let message = platform.post("debate", "alice", "**Withdraw**: Ban spam bots");
        lifecycle
            .handle_support_reaction(&message, 3)
            .await
            .unwrap();

        let proposal = store.record(message.id.as_str()).expect("tracked");
        assert!(proposal.is_withdrawal);
        let target = proposal.target_resolution.as_ref().expect("resolved");
        assert_eq!(target.resolution_id, resolution.id);
        assert_eq!(target.original_text, "Ban spam bots");

        platform.react("votes", &proposal.vote_message_id, render::YES_OPTION, 5);
        platform.react("votes", &proposal.vote_message_id, render::NO_OPTION, 1);
        clock.advance(Duration::hours(2));
        lifecycle.check_ended_votes().await.unwrap();

        assert_eq!(
            store.record(proposal.id.as_str()).unwrap().status,
            ProposalStatus::Passed
        );
        // Target record deleted, withdrawal notice posted in its place.
        assert!(!platform.contains_message("resolutions", &resolution.id));
        let resolutions = platform.contents_of("resolutions");
        assert!(resolutions.iter().any(|m| {
            m.contains("Ban spam bots") && m.contains("✅ 5 - ❌ 1")
        }));
    }

    #[tokio::test]
    async fn test_failed_withdrawal_keeps_target_resolution() {
        let (platform, store, clock, lifecycle) = fixture();
        let resolution = platform.post("resolutions", "agora", SPAM_RESOLUTION);

        let message = platform.post("debate", "alice", "**Withdraw**: Ban spam bots");
        lifecycle
            .handle_support_reaction(&message, 3)
            .await
            .unwrap();
        let proposal = store.record(message.id.as_str()).unwrap();

        platform.react("votes", &proposal.vote_message_id, render::NO_OPTION, 4);
        clock.advance(Duration::hours(2));
        lifecycle.check_ended_votes().await.unwrap();

        assert_eq!(
            store.record(proposal.id.as_str()).unwrap().status,
            ProposalStatus::Failed
        );
        assert!(platform.contains_message("resolutions", &resolution.id));
    }

    // ==================== live tally refresh ====================

    #[tokio::test]
    async fn test_vote_reaction_refreshes_counts() {
        let (platform, store, _clock, lifecycle) = fixture();
        let proposal =
            open_policy_vote(&platform, &store, &lifecycle, "**Policy**: Ban spam bots").await;

        platform.react("votes", &proposal.vote_message_id, render::YES_OPTION, 2);
        lifecycle
            .handle_vote_reaction(&proposal.vote_message_id)
            .await
            .unwrap();

        let record = store.record(proposal.id.as_str()).unwrap();
        assert_eq!(record.vote_counts, VoteCounts::new(2, 0));
        assert_eq!(record.status, ProposalStatus::Voting);
    }

    #[tokio::test]
    async fn test_vote_reaction_on_unknown_message_is_a_noop() {
        let (_platform, _store, _clock, lifecycle) = fixture();
        lifecycle
            .handle_vote_reaction(&MessageId::new("nope"))
            .await
            .unwrap();
    }
}
