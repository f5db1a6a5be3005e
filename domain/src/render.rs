//! Rendering of vote, resolution and notice messages.
//!
//! Kept in the domain so the resolution publisher and the withdrawal
//! resolver agree byte-for-byte on the markers a published resolution
//! carries ([`RESOLUTION_MARKER`] and [`PASSED_MARKER`]).

use crate::proposal::entities::{Proposal, TargetResolution, VoteCounts};
use chrono::{DateTime, Utc};

/// Reaction option counted as a yes vote. Seeded by the engine on every vote
/// message.
pub const YES_OPTION: &str = "✅";

/// Reaction option counted as a no vote. Seeded by the engine on every vote
/// message.
pub const NO_OPTION: &str = "❌";

/// Header marker every published resolution record starts with.
pub const RESOLUTION_MARKER: &str = "📜 **Resolution**";

/// Status marker carried by a published (passed, still active) resolution.
pub const PASSED_MARKER: &str = "✅ Passed";

/// Final tally in the fixed `✅ y - ❌ n` form.
pub fn tally(counts: VoteCounts) -> String {
    format!("{} {} - {} {}", YES_OPTION, counts.yes, NO_OPTION, counts.no)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// The message that opens a vote: original content, instructions, and the
/// fixed vote-end timestamp.
pub fn vote_message(content: &str, author: &str, end_time: DateTime<Utc>) -> String {
    format!(
        "🗳️ **Vote** — proposed by <@{author}>\n\n{content}\n\nReact {YES_OPTION} to approve \
         or {NO_OPTION} to reject. Voting ends {}.",
        timestamp(end_time)
    )
}

/// Outcome summary appended to the vote message at finalization.
pub fn vote_outcome(passed: bool, counts: VoteCounts) -> String {
    let verdict = if passed { PASSED_MARKER } else { "❌ Failed" };
    format!("\n\n**Vote closed** — {verdict} ({})", tally(counts))
}

/// Replacement body for the original debate message once its proposal has
/// moved to a vote.
pub fn debate_moved_notice(content: &str) -> String {
    format!("{content}\n\n*This proposal has moved to a vote.*")
}

/// The permanent resolution record for a passed proposal.
pub fn resolution_record(proposal: &Proposal, completed_at: DateTime<Utc>) -> String {
    format!(
        "{RESOLUTION_MARKER} — {PASSED_MARKER}\n\n{}\n\nProposed by <@{}> · type `{}` · \
         final tally {} · {}",
        proposal.content,
        proposal.author_id,
        proposal.kind,
        tally(proposal.vote_counts),
        timestamp(completed_at),
    )
}

/// Notice published when a withdrawal passes and its target resolution is
/// removed. Deliberately carries neither resolution marker, so the resolver
/// never mistakes it for an active resolution.
pub fn withdrawal_notice(target: &TargetResolution, counts: VoteCounts) -> String {
    format!(
        "🗑️ **Withdrawn** — the resolution \"{}\" has been revoked by community vote \
         ({}).",
        target.original_text,
        tally(counts),
    )
}

/// Notice sent when a withdrawal proposal references no locatable resolution.
pub fn withdrawal_rejected_notice(author: &str) -> String {
    format!(
        "<@{author}> your withdrawal proposal was rejected: no matching published \
         resolution could be found."
    )
}

/// Whether a rendered message is recognizable as an active, passed
/// resolution record.
pub fn is_published_resolution(text: &str) -> bool {
    text.contains(RESOLUTION_MARKER) && text.contains(PASSED_MARKER)
}
