//! `hubot-notify` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse arguments**: `send` runs the explicit notification step,
//!    `on-completed` runs the build-completion hook for a build snapshot.
//! 2. **Wire observability**: `tracing-subscriber` on stderr plus an optional
//!    OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: a [`transport::HubotClientFactory`] with
//!    the configured timeout, injected into the flows from `steps`.
//!
//! The ambient configuration (`HUBOT_URL`, `HUBOT_DEFAULT_ROOM`, ...) is read
//! from the process environment. Build-log lines go to stderr and the
//! notification result is printed to stdout as JSON.

mod args;
mod host;
mod observability;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use hubot::{EnvVars, LogSink, NotificationResult, StepParameters, TransportFactory};
use steps::{ExplicitStepExecution, FailureNotifier, StepContext};
use tracing::info;
use transport::HubotClientFactory;

use crate::args::{Cli, Command};
use crate::host::{ConsoleLog, SnapshotRun};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let telemetry = observability::init(cli.log_format)?;

    let factory: Arc<dyn TransportFactory> =
        Arc::new(HubotClientFactory::new(Duration::from_secs(cli.timeout_secs)));
    let env = EnvVars::from_process();

    let outcome = match cli.command {
        Command::Send(args) => send(factory, &env, &args.into(), &ConsoleLog).await,
        Command::OnCompleted { run } => on_completed(factory, &run, env, &ConsoleLog).await,
    };
    match &outcome {
        Ok(Some(result)) => info!(
            successful = result.successful,
            status_code = result.status_code,
            "hubot-notify finished"
        ),
        Ok(None) => info!("hubot-notify finished without sending"),
        Err(_) => {}
    }

    telemetry.shutdown();
    let result = outcome?;
    if let Some(result) = result {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("failed to encode result")?
        );
    }
    Ok(())
}

/// Runs the explicit step once. A [`hubot::StepAbort`] becomes the error.
async fn send(
    factory: Arc<dyn TransportFactory>,
    env: &EnvVars,
    params: &StepParameters,
    log: &dyn LogSink,
) -> anyhow::Result<Option<NotificationResult>> {
    let ctx = StepContext {
        env,
        causes: &[],
        log,
    };
    let result = ExplicitStepExecution::new(factory)
        .run(ctx, params)
        .await
        .context("hubot notification failed")?;
    Ok(Some(result))
}

async fn on_completed(
    factory: Arc<dyn TransportFactory>,
    path: &Path,
    env: EnvVars,
    log: &dyn LogSink,
) -> anyhow::Result<Option<NotificationResult>> {
    let run = SnapshotRun::load(path, env, log)?;
    Ok(FailureNotifier::new(factory).on_completed(&run, log).await)
}
