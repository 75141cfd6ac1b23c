//! Delivery of one message and normalization of its outcome.

use std::sync::Arc;

use hubot::{
    Configuration, LogSink, NotificationResult, Room, Transport, TransportError, TransportFactory,
};
use tracing::{info, warn};

/// Sends messages through transports created from the resolved endpoint URL.
#[derive(Clone)]
pub struct NotificationDispatcher {
    factory: Arc<dyn TransportFactory>,
}

impl NotificationDispatcher {
    pub fn new(factory: Arc<dyn TransportFactory>) -> Self {
        Self { factory }
    }

    /// Creates a transport for the configuration's sanitized endpoint URL.
    pub fn connect(&self, config: &Configuration) -> Result<Arc<dyn Transport>, TransportError> {
        self.factory.connect(&config.endpoint_url.sanitized())
    }

    /// Sends `message` to `room` and returns the normalized outcome.
    ///
    /// Never fails: client construction and transport errors become a result
    /// with status `-1`.
    pub async fn send(
        &self,
        config: &Configuration,
        room: &Room,
        message: &str,
        log: &dyn LogSink,
    ) -> NotificationResult {
        match self.connect(config) {
            Ok(transport) => deliver(transport.as_ref(), room, message, log).await,
            Err(err) => connect_failed(&err, room, log),
        }
    }
}

/// Normalizes a failure to create the transport client and logs it.
pub(crate) fn connect_failed(
    err: &TransportError,
    room: &Room,
    log: &dyn LogSink,
) -> NotificationResult {
    let result = NotificationResult::local_failure(err.root_cause_message());
    summarize(&result, room, log);
    result
}

/// Sends `message` through an existing transport and logs the outcome.
pub async fn deliver(
    transport: &dyn Transport,
    room: &Room,
    message: &str,
    log: &dyn LogSink,
) -> NotificationResult {
    let result = match transport.send_message(room, message).await {
        Ok(response) => NotificationResult::from_response(response),
        Err(err) => NotificationResult::local_failure(err.root_cause_message()),
    };
    summarize(&result, room, log);
    result
}

fn summarize(result: &NotificationResult, room: &Room, log: &dyn LogSink) {
    if result.successful {
        info!(room = %room, status_code = result.status_code, "hubot notification sent");
        log.line(&format!("Successful. Code: {}", result.status_code));
    } else {
        warn!(
            room = %room,
            status_code = result.status_code,
            error = result.error_message(),
            "hubot notification failed"
        );
        log.line(&format!(
            "Error Code: {}, Error Message: {}",
            result.status_code,
            result.error_message()
        ));
    }
}
