//! Shared value types for the notification domain.
//!
//! Everything here is supplied by the host per build or per step call and is
//! read-only to the core: the environment snapshot, the cause chain, the job
//! hierarchy, and the normalized notification result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Ambient environment
// ---------------------------------------------------------------------------

/// Names of the ambient variables read by the core.
pub mod vars {
    pub const HUBOT_URL: &str = "HUBOT_URL";
    pub const HUBOT_DEFAULT_ROOM: &str = "HUBOT_DEFAULT_ROOM";
    pub const HUBOT_NOTIFY_FAILED_BUILDS: &str = "HUBOT_NOTIFY_FAILED_BUILDS";
    pub const HUBOT_AUTO_ROOM: &str = "HUBOT_AUTO_ROOM";
    pub const HUBOT_CHANNEL_PREFIX: &str = "HUBOT_CHANNEL_PREFIX";
    pub const HUBOT_FAIL_ON_ERROR: &str = "HUBOT_FAIL_ON_ERROR";
    pub const BUILD_URL: &str = "BUILD_URL";
    pub const CHANGE_URL: &str = "CHANGE_URL";
    pub const CHANGE_AUTHOR: &str = "CHANGE_AUTHOR";
    pub const BUILD_NUMBER: &str = "BUILD_NUMBER";
    pub const JOB_NAME: &str = "JOB_NAME";
}

/// Snapshot of a build's environment variables.
///
/// An empty value is treated exactly like a missing one by [`EnvVars::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvVars(HashMap<String, String>);

impl EnvVars {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the current process environment.
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    /// Sets `key` to `value`, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the value of `key` if it is set and non-empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        fix_empty(self.0.get(key).map(String::as_str))
    }

    /// Returns the value of `key` parsed as a boolean flag.
    ///
    /// `None` when the variable is absent or is not `true`/`false`
    /// (case-insensitive).
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(parse_flag)
    }

    /// `JOB_NAME`, if set.
    pub fn job_name(&self) -> Option<&str> {
        self.get(vars::JOB_NAME)
    }

    /// `BUILD_NUMBER`, or `None` when the host did not provide one.
    pub fn build_number(&self) -> Option<&str> {
        self.get(vars::BUILD_NUMBER)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Maps an empty string to `None`.
pub fn fix_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Parses `true`/`false` case-insensitively.
pub fn parse_flag(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Build metadata
// ---------------------------------------------------------------------------

/// Terminal result of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

/// A record describing why a build started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cause {
    /// Started manually by a user.
    UserId {
        /// Display name of the user.
        user_name: String,
    },
    /// Started by the completion of an upstream build.
    Upstream {
        /// Causes of the upstream build, in host order.
        #[serde(default)]
        causes: Vec<Cause>,
    },
    /// Any other trigger (SCM poll, timer, remote API, ...).
    Other {
        #[serde(default)]
        description: String,
    },
}

/// A node in the job hierarchy: a job or a folder containing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobItem {
    /// Short name of the node (not the full path).
    pub name: String,
    /// What contains this node.
    #[serde(default)]
    pub parent: ItemParent,
}

/// The container of a [`JobItem`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemParent {
    /// The root of the job tree.
    #[default]
    Root,
    /// A named folder that can itself be traversed.
    Folder(Box<JobItem>),
    /// A container that is not a traversable item.
    Opaque,
}

impl JobItem {
    /// Creates a node whose parent is the root container.
    pub fn top_level(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: ItemParent::Root,
        }
    }

    /// Creates a node nested in `folder`.
    pub fn in_folder(name: impl Into<String>, folder: JobItem) -> Self {
        Self {
            name: name.into(),
            parent: ItemParent::Folder(Box::new(folder)),
        }
    }
}

// ---------------------------------------------------------------------------
// Step parameters
// ---------------------------------------------------------------------------

/// Explicit parameters of a pipeline notification step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepParameters {
    /// Overrides `HUBOT_URL` when non-empty.
    pub url: Option<String>,
    /// Overrides `HUBOT_DEFAULT_ROOM` when non-empty.
    pub room: Option<String>,
    /// Message sent verbatim.
    pub message: Option<String>,
    /// Default fail-on-error policy; `HUBOT_FAIL_ON_ERROR` overrides it.
    #[serde(default)]
    pub fail_on_error: bool,
}

// ---------------------------------------------------------------------------
// Transport response and normalized result
// ---------------------------------------------------------------------------

/// Raw response returned by a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse<T = String> {
    /// Whether the remote side reported success (2xx).
    pub successful: bool,
    /// HTTP status code.
    pub status_code: i32,
    /// HTTP reason phrase.
    pub status_message: String,
    /// Decoded body on success, raw error text otherwise.
    pub body: ResponseBody<T>,
}

/// Body of a [`TransportResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody<T> {
    Payload(T),
    Error(String),
}

/// Status code used for local or transport-level failures.
pub const LOCAL_FAILURE_CODE: i32 = -1;

/// Uniform outcome of one notification attempt.
///
/// Exactly one of `error_body` (unsuccessful) or `payload` (successful) is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResult<T = String> {
    pub successful: bool,
    /// HTTP status, or [`LOCAL_FAILURE_CODE`] for local failures.
    pub status_code: i32,
    pub status_message: String,
    pub error_body: Option<String>,
    pub payload: Option<T>,
}

impl<T: std::fmt::Display> NotificationResult<T> {
    /// Maps a transport response 1:1.
    ///
    /// A payload on an unsuccessful response is kept as the error body text.
    pub fn from_response(response: TransportResponse<T>) -> Self {
        let (error_body, payload) = match response.body {
            ResponseBody::Payload(payload) if response.successful => (None, Some(payload)),
            ResponseBody::Payload(payload) => (Some(payload.to_string()), None),
            ResponseBody::Error(body) => (Some(body), None),
        };
        Self {
            successful: response.successful && payload.is_some(),
            status_code: response.status_code,
            status_message: response.status_message,
            error_body,
            payload,
        }
    }
}

impl<T> NotificationResult<T> {
    /// Builds a local failure (status `-1`) carrying `message` as the error body.
    pub fn local_failure(message: impl Into<String>) -> Self {
        Self {
            successful: false,
            status_code: LOCAL_FAILURE_CODE,
            status_message: String::new(),
            error_body: Some(message.into()),
            payload: None,
        }
    }

    /// Error body, or an empty string when the attempt succeeded.
    pub fn error_message(&self) -> &str {
        self.error_body.as_deref().unwrap_or_default()
    }
}
