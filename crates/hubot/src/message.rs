//! Text of automatic failure notices and build naming helpers.

use crate::ports::LogSink;
use crate::types::EnvVars;

/// Build number used when the host provides none.
pub const DEFAULT_BUILD_NUMBER: &str = "1";

/// Details included in an automatic failure notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice<'a> {
    pub display_name: &'a str,
    pub build_url: Option<&'a str>,
    /// Pull-request URL for multibranch builds.
    pub change_url: Option<&'a str>,
    pub user: &'a str,
}

impl FailureNotice<'_> {
    /// Renders the notice as sent to Hubot.
    ///
    /// ```text
    /// acme » widgets #42 Job failed
    ///
    /// Job: https://ci/job/acme/job/widgets/42/
    /// Change URL: https://github.com/acme/widgets/pull/7
    /// User: alice
    /// ```
    pub fn render(&self) -> String {
        let mut text = format!(
            "{} Job failed\n\nJob: {}",
            self.display_name,
            self.build_url.unwrap_or_default()
        );
        if let Some(change_url) = self.change_url {
            text.push_str("\nChange URL: ");
            text.push_str(change_url);
        }
        text.push_str("\nUser: ");
        text.push_str(self.user);
        text
    }
}

/// `BUILD_NUMBER`, or [`DEFAULT_BUILD_NUMBER`] after logging that it is missing.
pub fn build_number<'a>(log: &dyn LogSink, env: &'a EnvVars) -> &'a str {
    match env.build_number() {
        Some(number) => number,
        None => {
            log.line("No BUILD_NUMBER!");
            DEFAULT_BUILD_NUMBER
        }
    }
}

/// Display name derived from `JOB_NAME` and `BUILD_NUMBER` (`"<job> #<number>"`).
///
/// Used when the host does not supply a display name of its own.
pub fn display_name_from_env(log: &dyn LogSink, env: &EnvVars) -> Option<String> {
    let job = env.job_name()?;
    Some(format!("{job} #{}", build_number(log, env)))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::types::vars;

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl LogSink for Lines {
        fn line(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn renders_notice_without_change_url() {
        let notice = FailureNotice {
            display_name: "app #7",
            build_url: Some("http://ci/job/app/7/"),
            change_url: None,
            user: "alice",
        };
        assert_eq!(
            notice.render(),
            "app #7 Job failed\n\nJob: http://ci/job/app/7/\nUser: alice"
        );
    }

    #[test]
    fn renders_notice_with_change_url() {
        let notice = FailureNotice {
            display_name: "acme » widgets » PR-3 #2",
            build_url: Some("http://ci/b/2/"),
            change_url: Some("https://scm/pr/3"),
            user: "bob",
        };
        assert_eq!(
            notice.render(),
            "acme » widgets » PR-3 #2 Job failed\n\nJob: http://ci/b/2/\nChange URL: https://scm/pr/3\nUser: bob"
        );
    }

    #[test]
    fn missing_build_url_renders_empty() {
        let notice = FailureNotice {
            display_name: "app #1",
            build_url: None,
            change_url: None,
            user: "anonymous",
        };
        assert!(notice.render().contains("\n\nJob: \nUser: anonymous"));
    }

    #[test]
    fn build_number_falls_back_and_logs() {
        let log = Lines::default();
        assert_eq!(build_number(&log, &EnvVars::new()), DEFAULT_BUILD_NUMBER);
        assert_eq!(log.0.lock().unwrap().as_slice(), ["No BUILD_NUMBER!"]);

        let env = EnvVars::new().with(vars::BUILD_NUMBER, "42");
        assert_eq!(build_number(&log, &env), "42");
        assert_eq!(log.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn display_name_needs_job_name() {
        let log = Lines::default();
        assert_eq!(display_name_from_env(&log, &EnvVars::new()), None);

        let env = EnvVars::new()
            .with(vars::JOB_NAME, "acme/widgets")
            .with(vars::BUILD_NUMBER, "9");
        assert_eq!(
            display_name_from_env(&log, &env).as_deref(),
            Some("acme/widgets #9")
        );
    }
}
