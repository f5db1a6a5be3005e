//! Chat platform port.
//!
//! Defines the minimal messaging surface the lifecycle engine needs:
//! sending, editing and deleting messages, managing reaction options, and
//! reading bounded channel history. Message/reaction *delivery*, rendering
//! and permission checks are the transport's concern.

use agora_domain::{ChannelId, MessageId, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur talking to the chat platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Channel not found: {0}")]
    ChannelNotFound(ChannelId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// A message as seen by the engine.
#[derive(Debug, Clone)]
pub struct ChannelMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub content: String,
}

/// Snapshot of the reaction counts on one message, by reaction option.
///
/// Taken once per operation and passed around explicitly, so tallies are
/// never read from shared mutable client state.
#[derive(Debug, Clone, Default)]
pub struct ReactionCounts(HashMap<String, u32>);

impl ReactionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for one reaction option (zero when absent).
    pub fn count(&self, option: &str) -> u32 {
        self.0.get(option).copied().unwrap_or(0)
    }

    pub fn set(&mut self, option: impl Into<String>, count: u32) {
        self.0.insert(option.into(), count);
    }
}

impl From<HashMap<String, u32>> for ReactionCounts {
    fn from(counts: HashMap<String, u32>) -> Self {
        Self(counts)
    }
}

/// Port for the messaging platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Send a message, returning the new message's id.
    async fn send_message(
        &self,
        channel: &ChannelId,
        content: &str,
    ) -> Result<MessageId, PlatformError>;

    /// Replace a message's content.
    async fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        content: &str,
    ) -> Result<(), PlatformError>;

    /// Delete a message.
    async fn delete_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
    ) -> Result<(), PlatformError>;

    /// Add a reaction option to a message (the engine's seed reaction).
    async fn add_reaction(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        option: &str,
    ) -> Result<(), PlatformError>;

    /// Read the current reaction counts on a message.
    async fn reaction_counts(
        &self,
        channel: &ChannelId,
        message: &MessageId,
    ) -> Result<ReactionCounts, PlatformError>;

    /// Fetch a single live message.
    async fn fetch_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
    ) -> Result<ChannelMessage, PlatformError>;

    /// Fetch the most recent messages in a channel, newest first, bounded by
    /// `limit`.
    async fn recent_messages(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, PlatformError>;
}
