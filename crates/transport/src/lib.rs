//! Hubot HTTP transport.
//!
//! Implements [`hubot::Transport`] against the notify endpoint exposed by the
//! Hubot Jenkins notifier script:
//!
//! ```text
//! POST <base>/hubot/notify/<room>
//! Content-Type: application/x-www-form-urlencoded
//!
//! message=<text>
//! ```
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL building, form encoding, and timeouts live here.
//! The `hubot` and `steps` crates see only [`hubot::Transport`] and
//! [`hubot::TransportFactory`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hubot::{ResponseBody, Room, Transport, TransportError, TransportFactory, TransportResponse};
use reqwest::Url;
use tracing::debug;

/// Request timeout used when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("hubot-notify/", env!("CARGO_PKG_VERSION"));

/// Client for a single Hubot instance.
#[derive(Debug, Clone)]
pub struct HubotClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HubotClient {
    /// Creates a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            TransportError::with_source(format!("invalid hubot URL '{base_url}'"), e)
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::new(format!(
                "hubot URL '{base_url}' cannot be used as a base URL"
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::with_source("failed to create hubot client", e))?;

        Ok(Self { http, base_url })
    }

    /// `<base>/hubot/notify/<room>` with the room escaped as one path segment.
    fn notify_url(&self, room: &Room) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::new("hubot URL cannot be used as a base URL"))?
            .pop_if_empty()
            .extend(["hubot", "notify", room.as_str()]);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HubotClient {
    async fn send_message(
        &self,
        room: &Room,
        text: &str,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.notify_url(room)?;
        debug!(url = %url, room = %room, "posting hubot notification");

        let response = self
            .http
            .post(url)
            .form(&[("message", text)])
            .send()
            .await
            .map_err(|e| TransportError::with_source("failed to send message to hubot", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::with_source("failed to read hubot response body", e))?;

        let successful = status.is_success();
        Ok(TransportResponse {
            successful,
            status_code: i32::from(status.as_u16()),
            status_message: status.canonical_reason().unwrap_or_default().to_string(),
            body: if successful {
                ResponseBody::Payload(body)
            } else {
                ResponseBody::Error(body)
            },
        })
    }
}

/// Creates a [`HubotClient`] per base URL.
#[derive(Debug, Clone)]
pub struct HubotClientFactory {
    timeout: Duration,
}

impl HubotClientFactory {
    /// Creates a factory whose clients use `timeout` for every request.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HubotClientFactory {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl TransportFactory for HubotClientFactory {
    fn connect(&self, base_url: &str) -> Result<Arc<dyn Transport>, TransportError> {
        Ok(Arc::new(HubotClient::new(base_url, self.timeout)?))
    }
}
