//! Chat platform adapters.

mod memory;

pub use memory::InMemoryChatPlatform;
