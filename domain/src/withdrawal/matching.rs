//! Matching strategies for locating the resolution a withdrawal revokes.
//!
//! A withdrawal references its target in free text, without a foreign key.
//! Candidates are tried against three strategies **in order**, first match
//! wins:
//!
//! 1. [`MatchStrategy::ExactContainment`] — case-insensitive substring in
//!    either direction between the withdrawal target text and the
//!    resolution's full text.
//! 2. [`MatchStrategy::LabeledField`] — same containment test against the
//!    resolution's extracted labeled field (`**Policy**: ...` style).
//! 3. [`MatchStrategy::KeywordOverlap`] — fraction of qualifying withdrawal
//!    tokens found as substrings of resolution tokens.
//!
//! The order is deliberate: the laxer overlap strategy can produce false
//! positives the strict ones would have avoided.
//!
//! An empty target text trivially satisfies containment in strategy 1 and
//! will match the first candidate scanned. That sensitivity is inherited
//! from the original heuristics and intentionally not special-cased.

use crate::proposal::classify::{WITHDRAW_LABEL, strip_labeled_prefix};
use regex::Regex;
use std::sync::LazyLock;

/// Minimum fraction of qualifying withdrawal tokens that must appear in the
/// resolution for a keyword-overlap match. Heuristic tunable.
pub const KEYWORD_OVERLAP_THRESHOLD: f64 = 0.60;

/// Withdrawal tokens of this length or shorter are discarded before the
/// overlap is computed. Heuristic tunable.
pub const MAX_DISCARDED_TOKEN_LEN: usize = 3;

/// A labeled field at the start of a line: an optionally-bold word (or short
/// phrase) followed by a colon, e.g. `**Policy**: Ban spam bots`.
static LABELED_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\*{0,2}[A-Za-z][A-Za-z -]{0,30}\*{0,2}\s*:\s*(.+)$")
        .expect("labeled field pattern is valid")
});

/// The strategy that produced a withdrawal match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Target text and resolution text contain one another.
    ExactContainment,
    /// Target text and the resolution's labeled field contain one another.
    LabeledField,
    /// Enough withdrawal keywords appear in the resolution.
    KeywordOverlap,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::ExactContainment => write!(f, "exact containment"),
            MatchStrategy::LabeledField => write!(f, "labeled field"),
            MatchStrategy::KeywordOverlap => write!(f, "keyword overlap"),
        }
    }
}

/// Extract the free-text target reference following the `Withdraw:` label.
///
/// Returns `None` when the label is malformed or absent.
pub fn extract_withdrawal_target(text: &str) -> Option<&str> {
    strip_labeled_prefix(text.trim(), WITHDRAW_LABEL).map(str::trim)
}

/// Extract the first labeled field from a resolution's rendered text.
pub fn extract_labeled_field(text: &str) -> Option<&str> {
    LABELED_FIELD
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

fn contains_either_way(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Fraction of qualifying withdrawal tokens (length > 3) that appear as a
/// substring of some resolution token. Returns 0.0 when no token qualifies;
/// degenerate inputs are the business of the containment strategies.
pub fn keyword_overlap(target: &str, resolution: &str) -> f64 {
    let resolution_tokens: Vec<String> = resolution
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    let kept: Vec<String> = target
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() > MAX_DISCARDED_TOKEN_LEN)
        .collect();

    if kept.is_empty() {
        return 0.0;
    }

    let hits = kept
        .iter()
        .filter(|t| resolution_tokens.iter().any(|r| r.contains(t.as_str())))
        .count();

    hits as f64 / kept.len() as f64
}

/// Try the ordered strategies against one candidate resolution text.
pub fn match_resolution(target: &str, resolution: &str) -> Option<MatchStrategy> {
    if contains_either_way(target, resolution) {
        return Some(MatchStrategy::ExactContainment);
    }

    if let Some(field) = extract_labeled_field(resolution)
        && contains_either_way(target, field)
    {
        return Some(MatchStrategy::LabeledField);
    }

    if keyword_overlap(target, resolution) >= KEYWORD_OVERLAP_THRESHOLD {
        return Some(MatchStrategy::KeywordOverlap);
    }

    None
}
