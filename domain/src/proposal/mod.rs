//! Proposal entities and classification.

pub mod classify;
pub mod entities;
