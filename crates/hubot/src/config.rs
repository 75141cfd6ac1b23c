//! Configuration resolution.
//!
//! Merges the ambient environment with the optional parameters of an explicit
//! step into one validated [`Configuration`]. Explicit parameters win when
//! non-empty, then the ambient variable, otherwise the setting is absent.
//!
//! Resolution only reads its inputs, so it is safe to repeat.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::identifiers::{ChannelPrefix, EndpointUrl, Room};
use crate::types::{fix_empty, vars, EnvVars, StepParameters};

/// Fully resolved settings for one notification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub endpoint_url: EndpointUrl,
    /// Configured room. The automatic path may replace it with an auto-room.
    pub room: Room,
    /// Set only for explicit steps.
    pub message: Option<String>,
    pub fail_on_error: bool,
    /// Value of `HUBOT_NOTIFY_FAILED_BUILDS`.
    pub notify_failed_builds: bool,
    pub auto_room: bool,
    pub channel_prefix: ChannelPrefix,
    pub build_url: Option<String>,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Automatic path with `HUBOT_NOTIFY_FAILED_BUILDS` unset: do nothing.
    Inert,
    /// A usable configuration.
    Ready(Configuration),
}

impl Resolution {
    /// Returns the configuration, or `None` for [`Resolution::Inert`].
    pub fn into_configuration(self) -> Option<Configuration> {
        match self {
            Resolution::Inert => None,
            Resolution::Ready(config) => Some(config),
        }
    }
}

/// Resolves settings for the automatic failure notifier (no step parameters).
pub fn resolve_ambient(env: &EnvVars) -> Result<Resolution, ConfigError> {
    resolve(env, None)
}

/// Resolves settings for an explicit step invocation.
///
/// Never returns [`Resolution::Inert`]: an explicit call always needs a
/// complete configuration.
pub fn resolve_step(env: &EnvVars, step: &StepParameters) -> Result<Configuration, ConfigError> {
    build(env, Some(step))
}

/// Resolves the configuration from `env` and the optional step parameters.
pub fn resolve(env: &EnvVars, step: Option<&StepParameters>) -> Result<Resolution, ConfigError> {
    if step.is_none() && env.get(vars::HUBOT_NOTIFY_FAILED_BUILDS).is_none() {
        return Ok(Resolution::Inert);
    }
    build(env, step).map(Resolution::Ready)
}

fn build(env: &EnvVars, step: Option<&StepParameters>) -> Result<Configuration, ConfigError> {
    let notify_failed_builds = env
        .get(vars::HUBOT_NOTIFY_FAILED_BUILDS)
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));

    let endpoint_url = pick(step.and_then(|s| s.url.as_deref()), env, vars::HUBOT_URL)
        .and_then(EndpointUrl::new)
        .ok_or(ConfigError::EndpointUrlMissing)?;

    let room = pick(step.and_then(|s| s.room.as_deref()), env, vars::HUBOT_DEFAULT_ROOM)
        .and_then(Room::new)
        .ok_or(ConfigError::DefaultRoomMissing)?;

    let message = match step {
        Some(step) => Some(
            fix_empty(step.message.as_deref())
                .ok_or(ConfigError::MessageMissing)?
                .to_string(),
        ),
        None => None,
    };

    let step_default = step.is_some_and(|s| s.fail_on_error);
    let fail_on_error = env.flag(vars::HUBOT_FAIL_ON_ERROR).unwrap_or(step_default);

    let auto_room = env
        .get(vars::HUBOT_AUTO_ROOM)
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));

    let channel_prefix = env
        .get(vars::HUBOT_CHANNEL_PREFIX)
        .and_then(ChannelPrefix::new)
        .unwrap_or_default();

    Ok(Configuration {
        endpoint_url,
        room,
        message,
        fail_on_error,
        notify_failed_builds,
        auto_room,
        channel_prefix,
        build_url: env.get(vars::BUILD_URL).map(str::to_string),
    })
}

/// Explicit value when non-empty, else the ambient variable when non-empty.
fn pick<'a>(explicit: Option<&'a str>, env: &'a EnvVars, key: &str) -> Option<&'a str> {
    fix_empty(explicit).or_else(|| env.get(key))
}
