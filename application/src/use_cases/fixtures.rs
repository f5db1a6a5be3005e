//! Shared in-memory test doubles for the use-case tests.

use crate::ports::chat_platform::{
    ChannelMessage, ChatPlatform, PlatformError, ReactionCounts,
};
use crate::ports::clock::Clock;
use crate::ports::proposal_store::{ProposalPatch, ProposalStore, StoreError};
use crate::use_cases::lifecycle::VoteLifecycle;
use agora_domain::{
    ChannelId, GovernanceConfig, GuildId, MessageId, Proposal, ProposalStatus,
    ProposalTypeConfig, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub(crate) struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub(crate) fn starting() -> Arc<Self> {
        let start = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        Arc::new(Self(Mutex::new(start)))
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[derive(Default)]
pub(crate) struct MemStore {
    records: Mutex<HashMap<String, Proposal>>,
    conflict_on_create: bool,
}

impl MemStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A store whose conditional create always reports a lost race.
    pub(crate) fn always_conflicting() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(HashMap::new()),
            conflict_on_create: true,
        })
    }

    pub(crate) fn record(&self, id: &str) -> Option<Proposal> {
        self.records.lock().unwrap().get(id).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl ProposalStore for MemStore {
    async fn create(&self, proposal: Proposal) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        let key = proposal.id.as_str().to_string();
        if self.conflict_on_create || records.contains_key(&key) {
            return Err(StoreError::AlreadyExists(proposal.id));
        }
        records.insert(key, proposal);
        Ok(())
    }

    async fn get(
        &self,
        _guild: &GuildId,
        id: &MessageId,
    ) -> Result<Option<Proposal>, StoreError> {
        Ok(self.records.lock().unwrap().get(id.as_str()).cloned())
    }

    async fn update(
        &self,
        _guild: &GuildId,
        id: &MessageId,
        patch: ProposalPatch,
    ) -> Result<Proposal, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(id.as_str())
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
        _guild: &GuildId,
        status: ProposalStatus,
    ) -> Result<Vec<Proposal>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    async fn query_by_type(
        &self,
        _guild: &GuildId,
        kind: &str,
    ) -> Result<Vec<Proposal>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.kind == kind)
            .cloned()
            .collect())
    }
}

struct TestMessage {
    id: MessageId,
    author: UserId,
    content: String,
    reactions: HashMap<String, u32>,
}

#[derive(Default)]
struct PlatformState {
    channels: HashMap<String, Vec<TestMessage>>,
    next_id: u64,
    failing_fetches: HashSet<String>,
}

pub(crate) struct MemPlatform {
    state: Mutex<PlatformState>,
}

impl MemPlatform {
    pub(crate) fn with_channels(names: &[&str]) -> Arc<Self> {
        let mut state = PlatformState::default();
        for name in names {
            state.channels.insert(name.to_string(), Vec::new());
        }
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    /// Post a message as a community member.
    pub(crate) fn post(&self, channel: &str, author: &str, content: &str) -> ChannelMessage {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = MessageId::new(format!("m{}", state.next_id));
        let message = TestMessage {
            id: id.clone(),
            author: UserId::new(author),
            content: content.to_string(),
            reactions: HashMap::new(),
        };
        state
            .channels
            .get_mut(channel)
            .expect("channel exists")
            .push(message);
        ChannelMessage {
            id,
            channel_id: ChannelId::new(channel),
            author_id: UserId::new(author),
            content: content.to_string(),
        }
    }

    /// Add `n` reactions for one option.
    pub(crate) fn react(&self, channel: &str, message: &MessageId, option: &str, n: u32) {
        let mut state = self.state.lock().unwrap();
        let msg = state
            .channels
            .get_mut(channel)
            .and_then(|m| m.iter_mut().find(|m| m.id == *message))
            .expect("message exists");
        *msg.reactions.entry(option.to_string()).or_insert(0) += n;
    }

    pub(crate) fn fail_fetch_of(&self, message: &MessageId) {
        self.state
            .lock()
            .unwrap()
            .failing_fetches
            .insert(message.as_str().to_string());
    }

    pub(crate) fn contents_of(&self, channel: &str) -> Vec<String> {
        self.state.lock().unwrap().channels[channel]
            .iter()
            .map(|m| m.content.clone())
            .collect()
    }

    pub(crate) fn contains_message(&self, channel: &str, message: &MessageId) -> bool {
        self.state.lock().unwrap().channels[channel]
            .iter()
            .any(|m| m.id == *message)
    }
}

#[async_trait]
impl ChatPlatform for MemPlatform {
    async fn send_message(
        &self,
        channel: &ChannelId,
        content: &str,
    ) -> Result<MessageId, PlatformError> {
        let mut state = self.state.lock().unwrap();
        if !state.channels.contains_key(channel.as_str()) {
            return Err(PlatformError::ChannelNotFound(channel.clone()));
        }
        state.next_id += 1;
        let id = MessageId::new(format!("m{}", state.next_id));
        let message = TestMessage {
            id: id.clone(),
            author: UserId::new("agora"),
            content: content.to_string(),
            reactions: HashMap::new(),
        };
        state
            .channels
            .get_mut(channel.as_str())
            .expect("checked above")
            .push(message);
        Ok(id)
    }

    async fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        content: &str,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        let msg = state
            .channels
            .get_mut(channel.as_str())
            .and_then(|m| m.iter_mut().find(|m| m.id == *message))
            .ok_or_else(|| PlatformError::MessageNotFound(message.clone()))?;
        msg.content = content.to_string();
        Ok(())
    }

    async fn delete_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        let messages = state
            .channels
            .get_mut(channel.as_str())
            .ok_or_else(|| PlatformError::ChannelNotFound(channel.clone()))?;
        let before = messages.len();
        messages.retain(|m| m.id != *message);
        if messages.len() == before {
            return Err(PlatformError::MessageNotFound(message.clone()));
        }
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        option: &str,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        let msg = state
            .channels
            .get_mut(channel.as_str())
            .and_then(|m| m.iter_mut().find(|m| m.id == *message))
            .ok_or_else(|| PlatformError::MessageNotFound(message.clone()))?;
        *msg.reactions.entry(option.to_string()).or_insert(0) += 1;
        Ok(())
    }

    async fn reaction_counts(
        &self,
        channel: &ChannelId,
        message: &MessageId,
    ) -> Result<ReactionCounts, PlatformError> {
        let state = self.state.lock().unwrap();
        let msg = state
            .channels
            .get(channel.as_str())
            .and_then(|m| m.iter().find(|m| m.id == *message))
            .ok_or_else(|| PlatformError::MessageNotFound(message.clone()))?;
        Ok(msg.reactions.clone().into())
    }

    async fn fetch_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
    ) -> Result<ChannelMessage, PlatformError> {
        let state = self.state.lock().unwrap();
        if state.failing_fetches.contains(message.as_str()) {
            return Err(PlatformError::Transport("simulated outage".to_string()));
        }
        let msg = state
            .channels
            .get(channel.as_str())
            .and_then(|m| m.iter().find(|m| m.id == *message))
            .ok_or_else(|| PlatformError::MessageNotFound(message.clone()))?;
        Ok(ChannelMessage {
            id: msg.id.clone(),
            channel_id: channel.clone(),
            author_id: msg.author.clone(),
            content: msg.content.clone(),
        })
    }

    async fn recent_messages(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, PlatformError> {
        let state = self.state.lock().unwrap();
        let messages = state
            .channels
            .get(channel.as_str())
            .ok_or_else(|| PlatformError::ChannelNotFound(channel.clone()))?;
        Ok(messages
            .iter()
            .rev()
            .take(limit)
            .map(|m| ChannelMessage {
                id: m.id.clone(),
                channel_id: channel.clone(),
                author_id: m.author.clone(),
                content: m.content.clone(),
            })
            .collect())
    }
}

pub(crate) fn config() -> GovernanceConfig {
    GovernanceConfig::new(vec![ProposalTypeConfig {
        name: "policy".to_string(),
        debate_channel: ChannelId::new("debate"),
        vote_channel: ChannelId::new("votes"),
        resolutions_channel: ChannelId::new("resolutions"),
        support_threshold: 3,
        vote_duration_secs: 3_600,
        format_labels: vec!["Policy".to_string()],
    }])
}

pub(crate) fn engine(
    platform: &Arc<MemPlatform>,
    store: &Arc<MemStore>,
    clock: &Arc<FixedClock>,
) -> VoteLifecycle {
    VoteLifecycle::new(
        Arc::clone(platform) as Arc<dyn ChatPlatform>,
        Arc::clone(store) as Arc<dyn ProposalStore>,
        Arc::clone(clock) as Arc<dyn Clock>,
        GuildId::new("g1"),
        config(),
    )
}

pub(crate) fn fixture() -> (
    Arc<MemPlatform>,
    Arc<MemStore>,
    Arc<FixedClock>,
    VoteLifecycle,
) {
    let platform = MemPlatform::with_channels(&["debate", "votes", "resolutions"]);
    let store = MemStore::new();
    let clock = FixedClock::starting();
    let lifecycle = engine(&platform, &store, &clock);
    (platform, store, clock, lifecycle)
}

pub(crate) const SPAM_RESOLUTION: &str =
    "📜 **Resolution** — ✅ Passed\n\n**Policy**: Ban spam bots\n\n\
     Proposed by <@alice> · type `policy` · final tally ✅ 6 - ❌ 2 · \
     2026-07-01 12:00 UTC";
