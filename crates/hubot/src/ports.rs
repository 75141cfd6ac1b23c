//! Port traits implemented by infrastructure crates and by the host.
//!
//! The core never talks to the network or the CI host directly; it is handed
//! implementations of these traits by the composition root.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{HostError, TransportError};
use crate::identifiers::Room;
use crate::types::{BuildResult, Cause, EnvVars, JobItem, TransportResponse};

/// Sends a single text message to a Hubot room.
///
/// Timeouts and connection policy belong to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts `text` to `room`.
    async fn send_message(&self, room: &Room, text: &str)
        -> Result<TransportResponse, TransportError>;
}

/// Creates [`Transport`] clients for a base URL.
pub trait TransportFactory: Send + Sync {
    /// Builds a client for `base_url`, which always ends with `/`.
    fn connect(&self, base_url: &str) -> Result<Arc<dyn Transport>, TransportError>;
}

/// The user-visible build log.
///
/// Distinct from `tracing`: lines written here are what the build's console
/// shows to the person reading it.
pub trait LogSink: Send + Sync {
    /// Appends one line to the build log.
    fn line(&self, message: &str);
}

/// Read access to a finished build, as supplied by the completion hook.
pub trait BuildRun: Send + Sync {
    /// Terminal result, or `None` if the host has not recorded one.
    fn result(&self) -> Option<BuildResult>;

    /// Causes that started the build, in host order.
    fn causes(&self) -> &[Cause];

    /// Environment snapshot of the build.
    fn environment(&self) -> Result<EnvVars, HostError>;

    /// Human-readable name of the build, e.g. `"acme » widgets #42"`.
    fn full_display_name(&self) -> String;

    /// The job this build belongs to.
    fn job(&self) -> &JobItem;
}
