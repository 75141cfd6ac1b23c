//! Error types for the notification domain.
//!
//! Only [`StepAbort`] is ever allowed to escape the core and fail a pipeline.
//! Everything else is captured, logged, and turned into a
//! [`crate::NotificationResult`] by the dispatcher.

use std::error::Error as StdError;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A required setting was absent from both the step parameters and the
/// ambient environment.
///
/// Always recoverable locally: the automatic path logs it and skips the
/// notification, the manual path returns it as an unsuccessful result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Neither the step's `url` nor `HUBOT_URL` is set.
    #[error("endpoint URL missing: set HUBOT_URL or the step's url parameter")]
    EndpointUrlMissing,

    /// Neither the step's `room` nor `HUBOT_DEFAULT_ROOM` is set.
    #[error("default room missing: set HUBOT_DEFAULT_ROOM or the step's room parameter")]
    DefaultRoomMissing,

    /// An explicit step was invoked without a message.
    #[error("message missing: the step's message parameter is empty")]
    MessageMissing,
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Network or protocol failure raised by a [`crate::Transport`].
///
/// Keeps the underlying error as its `source` so the dispatcher can report
/// the innermost cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl TransportError {
    /// Creates a transport error with no underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error wrapping `source`.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Message of the innermost error in this error's cause chain.
    pub fn root_cause_message(&self) -> String {
        root_cause_message(self)
    }
}

/// Follows `Error::source` links to the innermost error and returns its message.
///
/// The walk is capped at [`MAX_CAUSE_CHAIN`] links.
pub fn root_cause_message(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    for _ in 0..MAX_CAUSE_CHAIN {
        match current.source() {
            Some(next) => current = next,
            None => break,
        }
    }
    current.to_string()
}

/// Upper bound on the number of `source` links followed by [`root_cause_message`].
pub const MAX_CAUSE_CHAIN: usize = 64;

// ---------------------------------------------------------------------------
// Host errors
// ---------------------------------------------------------------------------

/// The host could not supply build information (e.g. the environment snapshot).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct HostError(pub String);

// ---------------------------------------------------------------------------
// Fatal abort
// ---------------------------------------------------------------------------

/// Fatal, user-visible abort of an explicit notification step.
///
/// Raised only when the notification failed and the effective fail-on-error
/// policy is `true`. Carries the error body of the failed notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StepAbort {
    /// Error body of the unsuccessful notification.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("socket closed by peer")]
    struct Innermost;

    #[derive(Debug, Error)]
    #[error("tls handshake failed")]
    struct Middle(#[source] Innermost);

    #[test]
    fn root_cause_follows_the_whole_chain() {
        let err = TransportError::with_source("request failed", Middle(Innermost));
        assert_eq!(err.to_string(), "request failed");
        assert_eq!(err.root_cause_message(), "socket closed by peer");
    }

    #[test]
    fn root_cause_of_leaf_error_is_itself() {
        let err = TransportError::new("connection refused");
        assert_eq!(err.root_cause_message(), "connection refused");
    }

    #[test]
    fn config_errors_name_the_missing_setting() {
        assert!(ConfigError::EndpointUrlMissing.to_string().starts_with("endpoint URL missing"));
        assert!(ConfigError::DefaultRoomMissing.to_string().starts_with("default room missing"));
        assert!(ConfigError::MessageMissing.to_string().starts_with("message missing"));
    }
}
