//! In-memory chat platform.
//!
//! Backs the `simulate` command: a handful of named channels holding
//! ordered messages with reaction tallies. A real transport adapter
//! implements the same [`ChatPlatform`] port against the messaging
//! service's API.

use agora_application::ports::chat_platform::{
    ChannelMessage, ChatPlatform, PlatformError, ReactionCounts,
};
use agora_domain::{ChannelId, MessageId, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

const ENGINE_AUTHOR: &str = "agora";

#[derive(Debug, Clone)]
struct StoredMessage {
    id: MessageId,
    author: UserId,
    content: String,
    reactions: HashMap<String, u32>,
}

impl StoredMessage {
    fn to_channel_message(&self, channel: &ChannelId) -> ChannelMessage {
        ChannelMessage {
            id: self.id.clone(),
            channel_id: channel.clone(),
            author_id: self.author.clone(),
            content: self.content.clone(),
        }
    }
}

#[derive(Default)]
struct Inner {
    channels: HashMap<String, Vec<StoredMessage>>,
    next_id: u64,
}

impl Inner {
    fn next_message_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId::new(format!("msg-{}", self.next_id))
    }

    fn message_mut(
        &mut self,
        channel: &ChannelId,
        message: &MessageId,
    ) -> Result<&mut StoredMessage, PlatformError> {
        self.channels
            .get_mut(channel.as_str())
            .ok_or_else(|| PlatformError::ChannelNotFound(channel.clone()))?
            .iter_mut()
            .find(|m| m.id == *message)
            .ok_or_else(|| PlatformError::MessageNotFound(message.clone()))
    }
}

/// Chat platform backed by process memory.
#[derive(Default)]
pub struct InMemoryChatPlatform {
    inner: Mutex<Inner>,
}

impl InMemoryChatPlatform {
    /// Create a platform with the given channels already present.
    pub fn with_channels<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inner = Inner::default();
        for name in names {
            inner.channels.insert(name.into(), Vec::new());
        }
        Self {
            inner: Mutex::new(inner),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // No mutation leaves the maps in a half-written state, so a
        // poisoned lock is still safe to reuse.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Post a message authored by a community member (not the engine).
    pub fn post_user_message(
        &self,
        channel: &ChannelId,
        author: &UserId,
        content: impl Into<String>,
    ) -> Result<ChannelMessage, PlatformError> {
        let mut inner = self.lock();
        if !inner.channels.contains_key(channel.as_str()) {
            return Err(PlatformError::ChannelNotFound(channel.clone()));
        }
        let id = inner.next_message_id();
        let message = StoredMessage {
            id,
            author: author.clone(),
            content: content.into(),
            reactions: HashMap::new(),
        };
        let rendered = message.to_channel_message(channel);
        inner
            .channels
            .get_mut(channel.as_str())
            .ok_or_else(|| PlatformError::ChannelNotFound(channel.clone()))?
            .push(message);
        Ok(rendered)
    }

    /// Add `count` reactions of one option to a message.
    pub fn add_reactions(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        option: &str,
        count: u32,
    ) -> Result<(), PlatformError> {
        let mut inner = self.lock();
        let msg = inner.message_mut(channel, message)?;
        *msg.reactions.entry(option.to_string()).or_insert(0) += count;
        Ok(())
    }

    /// All message contents of a channel, oldest first.
    pub fn channel_contents(&self, channel: &ChannelId) -> Vec<String> {
        self.lock()
            .channels
            .get(channel.as_str())
            .map(|messages| messages.iter().map(|m| m.content.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatPlatform for InMemoryChatPlatform {
    async fn send_message(
        &self,
        channel: &ChannelId,
        content: &str,
    ) -> Result<MessageId, PlatformError> {
        let message = self.post_user_message(
            channel,
            &UserId::new(ENGINE_AUTHOR),
            content,
        )?;
        Ok(message.id)
    }

    async fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        content: &str,
    ) -> Result<(), PlatformError> {
        let mut inner = self.lock();
        inner.message_mut(channel, message)?.content = content.to_string();
        Ok(())
    }

    async fn delete_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
    ) -> Result<(), PlatformError> {
        let mut inner = self.lock();
        let messages = inner
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
        self.add_reactions(channel, message, option, 1)
    }

    async fn reaction_counts(
        &self,
        channel: &ChannelId,
        message: &MessageId,
    ) -> Result<ReactionCounts, PlatformError> {
        let mut inner = self.lock();
        Ok(inner.message_mut(channel, message)?.reactions.clone().into())
    }

    async fn fetch_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
    ) -> Result<ChannelMessage, PlatformError> {
        let mut inner = self.lock();
        Ok(inner.message_mut(channel, message)?.to_channel_message(channel))
    }

    async fn recent_messages(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, PlatformError> {
        let inner = self.lock();
        let messages = inner
            .channels
            .get(channel.as_str())
            .ok_or_else(|| PlatformError::ChannelNotFound(channel.clone()))?;
        // Newest first, matching how chat APIs page history.
        Ok(messages
            .iter()
            .rev()
            .take(limit)
            .map(|m| m.to_channel_message(channel))
            .collect())
    }
}
