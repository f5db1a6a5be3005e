//! Proposal classification.
//!
//! Maps an inbound message (channel + text) to a proposal type and
//! withdrawal flag. A message is a valid proposal when it was posted in a
//! configured debate channel and its trimmed text starts with one of the
//! type's format labels — or the reserved "Withdraw" label — followed by a
//! colon. Labels match case-insensitively and may be wrapped in `**` bold
//! markers, so `**Policy**: x` and `policy: x` are both accepted.

use crate::config::{GovernanceConfig, ProposalTypeConfig};
use crate::core::ids::ChannelId;

/// Reserved label that marks a proposal as a withdrawal, valid for every
/// configured proposal type.
pub const WITHDRAW_LABEL: &str = "Withdraw";

/// A successfully classified proposal message.
#[derive(Debug, Clone, Copy)]
pub struct Classification<'a> {
    /// Name of the matched proposal type.
    pub kind: &'a str,
    /// The matched type's configuration.
    pub config: &'a ProposalTypeConfig,
    /// True iff the reserved withdraw label matched.
    pub is_withdrawal: bool,
}

/// Strip a `label:` prefix (optionally bold, case-insensitive) from `text`,
/// returning the remainder after the colon.
///
/// Returns `None` when the label or the colon is absent.
pub fn strip_labeled_prefix<'t>(text: &'t str, label: &str) -> Option<&'t str> {
    let rest = text.trim_start_matches('*');
    let head = rest.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    let tail = rest[label.len()..].trim_start_matches('*');
    tail.strip_prefix(':')
}

/// Classify a message posted in `channel`.
///
/// Returns `None` when no configured type uses the channel for debate, or
/// when the channel matches but the label format does not — callers treat
/// both identically (not a valid proposal).
pub fn classify<'a>(
    config: &'a GovernanceConfig,
    channel: &ChannelId,
    text: &str,
) -> Option<Classification<'a>> {
    let trimmed = text.trim();

    for ty in &config.types {
        if ty.debate_channel != *channel {
            continue;
        }
        if strip_labeled_prefix(trimmed, WITHDRAW_LABEL).is_some() {
            return Some(Classification {
                kind: &ty.name,
                config: ty,
                is_withdrawal: true,
            });
        }
        for label in &ty.format_labels {
            if strip_labeled_prefix(trimmed, label).is_some() {
                return Some(Classification {
                    kind: &ty.name,
                    config: ty,
                    is_withdrawal: false,
                });
            }
        }
        // Channel matched but no label did: not a valid proposal.
        return None;
    }

    None
}
