//! Withdrawal target resolution use case.
//!
//! Given the text of a withdrawal proposal, scans the recent history of the
//! type's resolutions channel for the published resolution it revokes. The
//! matching strategies themselves are pure domain logic
//! ([`agora_domain::withdrawal::matching`]); this use case owns the channel
//! scan and candidate filtering.

use crate::ports::chat_platform::{ChatPlatform, PlatformError};
use agora_domain::{
    ProposalTypeConfig, TargetResolution, extract_labeled_field, extract_withdrawal_target,
    match_resolution, render,
};
use std::sync::Arc;
use tracing::debug;

/// How many recent resolutions-channel messages are scanned for a target.
/// Bounded lookback: older resolutions cannot be withdrawn by text match.
pub const RESOLUTION_LOOKBACK: usize = 50;

/// Resolves withdrawal proposals to the resolution they revoke.
pub struct WithdrawalResolver {
    platform: Arc<dyn ChatPlatform>,
}

impl WithdrawalResolver {
    pub fn new(platform: Arc<dyn ChatPlatform>) -> Self {
        Self { platform }
    }

    /// Find the best-matching published resolution for `withdrawal_text`.
    ///
    /// Returns `Ok(None)` when the withdrawal label is malformed or no
    /// candidate in the lookback window matches.
    pub async fn resolve(
        &self,
        withdrawal_text: &str,
        config: &ProposalTypeConfig,
    ) -> Result<Option<TargetResolution>, PlatformError> {
        let Some(target) = extract_withdrawal_target(withdrawal_text) else {
            debug!("withdrawal label is malformed; nothing to resolve");
            return Ok(None);
        };

        let candidates = self
            .platform
            .recent_messages(&config.resolutions_channel, RESOLUTION_LOOKBACK)
            .await?;

        for message in candidates {
            // Only active, passed resolutions qualify.
            if !render::is_published_resolution(&message.content) {
                continue;
            }

            if let Some(strategy) = match_resolution(target, &message.content) {
                debug!(resolution = %message.id, %strategy, "withdrawal target matched");
                let original_text = extract_labeled_field(&message.content)
                    .unwrap_or(&message.content)
                    .to_string();
                return Ok(Some(TargetResolution {
                    resolution_id: message.id,
                    channel_id: config.resolutions_channel.clone(),
                    raw_content: message.content,
                    original_text,
                }));
            }
        }

        Ok(None)
    }
}
