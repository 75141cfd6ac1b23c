//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hubot::StepParameters;

#[derive(Debug, Parser)]
#[command(
    name = "hubot-notify",
    about = "Send build notifications to a Hubot instance",
    version
)]
pub struct Cli {
    #[arg(
        long,
        env = "HUBOT_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        global = true,
        help = "Format of diagnostic output written to stderr."
    )]
    pub log_format: LogFormat,

    #[arg(
        long,
        env = "HUBOT_TIMEOUT_SECS",
        default_value_t = 30,
        global = true,
        help = "HTTP request timeout in seconds."
    )]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a message, like the `hubotSend` pipeline step.
    Send(SendArgs),

    /// Handle a completed build, notifying Hubot if it failed.
    OnCompleted {
        #[arg(long, help = "Path to the JSON snapshot of the completed build.")]
        run: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
pub struct SendArgs {
    #[arg(long, help = "Hubot URL. Falls back to HUBOT_URL.")]
    pub url: Option<String>,

    #[arg(long, help = "Room to post to. Falls back to HUBOT_DEFAULT_ROOM.")]
    pub room: Option<String>,

    #[arg(long, short, help = "Message to send verbatim.")]
    pub message: Option<String>,

    #[arg(
        long,
        help = "Exit with an error when the message cannot be delivered. HUBOT_FAIL_ON_ERROR overrides this."
    )]
    pub fail_on_error: bool,
}

impl From<SendArgs> for StepParameters {
    fn from(args: SendArgs) -> Self {
        StepParameters {
            url: args.url,
            room: args.room,
            message: args.message,
            fail_on_error: args.fail_on_error,
        }
    }
}
