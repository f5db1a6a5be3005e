//! Identifier value objects for the chat platform.
//!
//! All four are opaque string newtypes: the engine never interprets their
//! contents, it only keys records and routes messages with them.
//!
//! - [`GuildId`] - Owning community
//! - [`ChannelId`] - Debate / vote / resolutions destination
//! - [`MessageId`] - A single message (also the proposal key)
//! - [`UserId`] - A community member

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifier of the community that owns a proposal.
    GuildId
}

string_id! {
    /// Identifier of a channel on the chat platform.
    ChannelId
}

string_id! {
    /// Identifier of a message. Proposals are keyed by the id of their
    /// originating debate message.
    MessageId
}

string_id! {
    /// Identifier of a community member.
    UserId
}
