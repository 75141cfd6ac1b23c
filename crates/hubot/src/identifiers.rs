//! Newtype domain identifiers.
//!
//! The endpoint URL, room, and channel prefix are all plain strings on the
//! wire, but each carries its own non-empty invariant and must never be
//! swapped for another. Wrapping them keeps [`crate::Configuration`] honest.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
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
    /// Base URL of the Hubot instance (e.g. `"https://hubot.example.com"`).
    ///
    /// Stored exactly as configured; use [`EndpointUrl::sanitized`] when
    /// building a transport client.
    EndpointUrl
}

string_id! {
    /// Target channel or recipient for a chat notification.
    Room
}

string_id! {
    /// Prefix prepended to auto-derived room names (`"<prefix>-<folder>"`).
    ChannelPrefix
}

impl EndpointUrl {
    /// Returns the URL with exactly one trailing `/`.
    pub fn sanitized(&self) -> String {
        sanitize_url(&self.0)
    }
}

impl ChannelPrefix {
    /// Builds the auto-room name for the given top-level folder.
    pub fn room_for(&self, folder: &str) -> Option<Room> {
        Room::new(format!("{}-{}", self.0, folder))
    }
}

impl Default for ChannelPrefix {
    fn default() -> Self {
        Self(DEFAULT_CHANNEL_PREFIX.to_string())
    }
}

/// Channel prefix used when `HUBOT_CHANNEL_PREFIX` is not set.
pub const DEFAULT_CHANNEL_PREFIX: &str = "bot";

/// Collapses any trailing `/` run in `url` to exactly one `/`.
///
/// Idempotent: `sanitize_url(&sanitize_url(u)) == sanitize_url(u)`.
pub fn sanitize_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single notification attempt.
///
/// Generated fresh for every hook invocation or explicit step call and
/// recorded on the attempt's tracing span so all of its events correlate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(Uuid);

impl AttemptId {
    /// Generates a new random attempt identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
