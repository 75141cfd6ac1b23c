//! Automatic notification of failed builds.
//!
//! Wired to the host's build-completion hook. Enabled by
//! `HUBOT_NOTIFY_FAILED_BUILDS=true`; with `HUBOT_AUTO_ROOM=true` the notice
//! goes to `<HUBOT_CHANNEL_PREFIX>-<top-level folder>` instead of the
//! default room, so each organisation gets its own channel.
//!
//! Nothing on this path can fail the build: every problem is written to the
//! build log and the hook returns.

use std::sync::Arc;

use hubot::{
    resolve_ambient, resolve_user, top_level_folder_name, vars, AttemptId, BuildResult, BuildRun,
    FailureNotice, LogSink, NotificationResult, Resolution, TransportFactory,
};
use tracing::{debug, instrument};

use crate::dispatcher::NotificationDispatcher;

/// Build-completion hook that posts a notice for every failed build.
///
/// Holds no per-build state, so one instance can serve many builds finishing
/// at the same time.
#[derive(Clone)]
pub struct FailureNotifier {
    dispatcher: NotificationDispatcher,
}

impl FailureNotifier {
    pub fn new(factory: Arc<dyn TransportFactory>) -> Self {
        Self {
            dispatcher: NotificationDispatcher::new(factory),
        }
    }

    /// Handles one completed build.
    ///
    /// Returns the delivery outcome, or `None` when no notice was sent.
    #[instrument(
        name = "hubot.on_completed",
        skip_all,
        fields(attempt_id = %AttemptId::new_random(), build = %run.full_display_name())
    )]
    pub async fn on_completed(
        &self,
        run: &dyn BuildRun,
        log: &dyn LogSink,
    ) -> Option<NotificationResult> {
        if run.result() != Some(BuildResult::Failure) {
            debug!(result = ?run.result(), "build did not fail; nothing to send");
            return None;
        }

        let env = match run.environment() {
            Ok(env) => env,
            Err(err) => {
                log.line(&format!("Hubot: Error sending job failed message. {err}"));
                return None;
            }
        };

        let config = match resolve_ambient(&env) {
            Ok(Resolution::Ready(config)) if config.notify_failed_builds => config,
            Ok(_) => {
                debug!("failed-build notifications are disabled");
                return None;
            }
            Err(err) => {
                log.line(&format!("Hubot: Error sending job failed message. {err}"));
                return None;
            }
        };

        let user = resolve_user(run.causes(), &env);

        let room = if config.auto_room {
            let folder = top_level_folder_name(run.job());
            config
                .channel_prefix
                .room_for(folder)
                .unwrap_or_else(|| config.room.clone())
        } else {
            config.room.clone()
        };

        let display_name = run.full_display_name();
        let message = FailureNotice {
            display_name: &display_name,
            build_url: config.build_url.as_deref(),
            change_url: env.get(vars::CHANGE_URL),
            user: &user,
        }
        .render();

        debug!(room = %room, user = %user, "sending failed-build notice");
        Some(self.dispatcher.send(&config, &room, &message, log).await)
    }
}
