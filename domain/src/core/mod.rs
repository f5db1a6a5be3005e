//! Core domain primitives: identifiers.

pub mod ids;
