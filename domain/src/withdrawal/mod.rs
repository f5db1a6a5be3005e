//! Withdrawal target matching.

pub mod matching;
