//! Adapters standing in for the CI host.
//!
//! The build console is the process's stderr, and a completed build is
//! described by a JSON snapshot written by the CI job runner:
//!
//! ```json
//! {
//!   "result": "FAILURE",
//!   "display_name": "acme » widgets #42",
//!   "causes": [{ "kind": "user_id", "user_name": "alice" }],
//!   "job": { "name": "widgets", "parent": { "kind": "folder", "name": "acme" } },
//!   "environment": { "BUILD_URL": "https://ci/job/acme/job/widgets/42/" }
//! }
//! ```
//!
//! Variables in `environment` are layered over the process environment.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use hubot::{
    display_name_from_env, BuildResult, BuildRun, Cause, EnvVars, HostError, JobItem, LogSink,
};
use serde::Deserialize;

/// Writes build-log lines to stderr.
pub struct ConsoleLog;

impl LogSink for ConsoleLog {
    fn line(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[derive(Debug, Deserialize)]
struct RunSnapshot {
    result: Option<BuildResult>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    causes: Vec<Cause>,
    job: JobItem,
    #[serde(default)]
    environment: HashMap<String, String>,
}

/// A completed build loaded from a snapshot file.
#[derive(Debug)]
pub struct SnapshotRun {
    result: Option<BuildResult>,
    display_name: String,
    causes: Vec<Cause>,
    job: JobItem,
    env: EnvVars,
}

impl SnapshotRun {
    /// Reads the snapshot at `path`, layering its environment over `base`.
    pub fn load(path: &Path, base: EnvVars, log: &dyn LogSink) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read build snapshot {}", path.display()))?;
        Self::parse(&raw, base, log)
            .with_context(|| format!("invalid build snapshot {}", path.display()))
    }

    fn parse(raw: &str, base: EnvVars, log: &dyn LogSink) -> anyhow::Result<Self> {
        let snapshot: RunSnapshot = serde_json::from_str(raw)?;

        let env = snapshot
            .environment
            .into_iter()
            .fold(base, |env, (key, value)| env.with(key, value));

        let display_name = match snapshot.display_name.filter(|name| !name.is_empty()) {
            Some(name) => name,
            None => display_name_from_env(log, &env).unwrap_or_else(|| snapshot.job.name.clone()),
        };

        Ok(Self {
            result: snapshot.result,
            display_name,
            causes: snapshot.causes,
            job: snapshot.job,
            env,
        })
    }
}

impl BuildRun for SnapshotRun {
    fn result(&self) -> Option<BuildResult> {
        self.result
    }

    fn causes(&self) -> &[Cause] {
        &self.causes
    }

    fn environment(&self) -> Result<EnvVars, HostError> {
        Ok(self.env.clone())
    }

    fn full_display_name(&self) -> String {
        self.display_name.clone()
    }

    fn job(&self) -> &JobItem {
        &self.job
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use hubot::vars;

    use super::*;

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl LogSink for Lines {
        fn line(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn parses_full_snapshot() {
        let raw = r#"{
            "result": "FAILURE",
            "display_name": "acme » widgets #42",
            "causes": [{"kind": "upstream", "causes": [{"kind": "user_id", "user_name": "alice"}]}],
            "job": {"name": "widgets", "parent": {"kind": "folder", "name": "acme"}},
            "environment": {"BUILD_URL": "https://ci/42/"}
        }"#;
        let base = EnvVars::new().with(vars::HUBOT_URL, "http://hubot");

        let run = SnapshotRun::parse(raw, base, &Lines::default()).unwrap();

        assert_eq!(run.result(), Some(BuildResult::Failure));
        assert_eq!(run.full_display_name(), "acme » widgets #42");
        assert_eq!(hubot::top_level_folder_name(run.job()), "acme");
        assert_eq!(hubot::resolve_user(run.causes(), &run.env), "alice");
        let env = run.environment().unwrap();
        assert_eq!(env.get(vars::BUILD_URL), Some("https://ci/42/"));
        assert_eq!(env.get(vars::HUBOT_URL), Some("http://hubot"));
    }

    #[test]
    fn snapshot_environment_wins_over_process() {
        let raw = r#"{"result": "FAILURE", "job": {"name": "app"},
                      "environment": {"HUBOT_DEFAULT_ROOM": "builds"}}"#;
        let base = EnvVars::new().with(vars::HUBOT_DEFAULT_ROOM, "ops");

        let run = SnapshotRun::parse(raw, base, &Lines::default()).unwrap();

        assert_eq!(run.env.get(vars::HUBOT_DEFAULT_ROOM), Some("builds"));
    }

    #[test]
    fn display_name_falls_back_to_job_name_and_build_number() {
        let raw = r#"{"result": "SUCCESS", "job": {"name": "app"},
                      "environment": {"JOB_NAME": "team/app"}}"#;
        let log = Lines::default();

        let run = SnapshotRun::parse(raw, EnvVars::new(), &log).unwrap();

        assert_eq!(run.full_display_name(), "team/app #1");
        assert_eq!(log.0.lock().unwrap().as_slice(), ["No BUILD_NUMBER!"]);
    }

    #[test]
    fn display_name_falls_back_to_job() {
        let raw = r#"{"result": null, "job": {"name": "app"}}"#;
        let run = SnapshotRun::parse(raw, EnvVars::new(), &Lines::default()).unwrap();
        assert_eq!(run.full_display_name(), "app");
        assert_eq!(run.result(), None);
    }

    #[test]
    fn rejects_unknown_results() {
        let raw = r#"{"result": "EXPLODED", "job": {"name": "app"}}"#;
        assert!(SnapshotRun::parse(raw, EnvVars::new(), &Lines::default()).is_err());
    }
}
