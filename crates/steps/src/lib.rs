//! Hubot notification flows.
//!
//! Two entry points share one dispatcher:
//!
//! - [`FailureNotifier`]: the build-completion hook. Sends a composed notice
//!   for failed builds and never fails the build itself.
//! - [`ExplicitStepExecution`]: the pipeline step. Sends the caller's message
//!   verbatim and aborts the caller with [`hubot::StepAbort`] when delivery
//!   fails under a fail-on-error policy.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** These flows sequence calls between the business
//! logic in the [`hubot`] crate and an injected [`hubot::TransportFactory`].
//! They contain no configuration rules of their own.

pub mod dispatcher;
pub mod explicit;
pub mod failure;

#[cfg(test)]
mod testing;

pub use dispatcher::{deliver, NotificationDispatcher};
pub use explicit::{ExplicitStepExecution, StepContext};
pub use failure::FailureNotifier;
