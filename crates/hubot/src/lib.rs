//! Core domain for Hubot build notifications.
//!
//! This crate decides *what* to send and *where*: it resolves the layered
//! configuration, finds the triggering user and the auto-room folder, and
//! defines the ports the orchestration and infrastructure crates plug into.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! The HTTP transport lives in `transport`; the automatic and explicit
//! notification flows live in `steps`.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtypes (`EndpointUrl`, `Room`, `ChannelPrefix`, `AttemptId`) and URL sanitizing |
//! | [`types`] | Environment snapshot, causes, job hierarchy, step parameters, results |
//! | [`errors`] | Configuration, transport, host, and abort errors |
//! | [`config`] | Configuration resolution |
//! | [`cause`] | Triggering-user lookup |
//! | [`folder`] | Top-level folder lookup |
//! | [`message`] | Failure notice text and build naming helpers |
//! | [`ports`] | `Transport`, `TransportFactory`, `LogSink`, `BuildRun` |

pub mod cause;
pub mod config;
pub mod errors;
pub mod folder;
pub mod identifiers;
pub mod message;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use cause::{resolve_user, ANONYMOUS, MAX_CAUSE_DEPTH};
pub use config::{resolve, resolve_ambient, resolve_step, Configuration, Resolution};
pub use errors::{root_cause_message, ConfigError, HostError, StepAbort, TransportError};
pub use folder::{top_level_folder_name, MAX_FOLDER_DEPTH};
pub use identifiers::{sanitize_url, AttemptId, ChannelPrefix, EndpointUrl, Room};
pub use message::{build_number, display_name_from_env, FailureNotice};
pub use ports::{BuildRun, LogSink, Transport, TransportFactory};
pub use types::{
    vars, BuildResult, Cause, EnvVars, ItemParent, JobItem, NotificationResult, ResponseBody,
    StepParameters, TransportResponse, LOCAL_FAILURE_CODE,
};
