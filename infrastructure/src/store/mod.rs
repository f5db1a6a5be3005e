//! Proposal persistence adapters.

mod memory;

pub use memory::InMemoryProposalStore;
