//! In-memory fakes of the `hubot` ports shared by this crate's tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hubot::{
    BuildResult, BuildRun, Cause, EnvVars, HostError, JobItem, LogSink, ResponseBody, Room,
    Transport, TransportError, TransportFactory, TransportResponse,
};
use thiserror::Error;

type Reply = Box<dyn Fn() -> Result<TransportResponse, TransportError> + Send + Sync>;

/// Records every message and answers with a fixed reply.
pub struct RecordingTransport {
    reply: Reply,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    pub fn replying(status_code: i32, body: &str) -> Arc<Self> {
        let body = body.to_string();
        Self::with_reply(Box::new(move || -> Result<TransportResponse, TransportError> {
            let successful = (200..300).contains(&status_code);
            Ok(TransportResponse {
                successful,
                status_code,
                status_message: String::new(),
                body: if successful {
                    ResponseBody::Payload(body.clone())
                } else {
                    ResponseBody::Error(body.clone())
                },
            })
        }))
    }

    pub fn failing(error: fn() -> TransportError) -> Arc<Self> {
        Self::with_reply(Box::new(move || -> Result<TransportResponse, TransportError> {
            Err(error())
        }))
    }

    fn with_reply(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            sent: Mutex::new(Vec::new()),
        })
    }

    /// `(room, text)` pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_message(
        &self,
        room: &Room,
        text: &str,
    ) -> Result<TransportResponse, TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push((room.to_string(), text.to_string()));
        (self.reply)()
    }
}

/// Hands out one shared transport and records the base URLs asked for.
pub struct RecordingFactory {
    transport: Option<Arc<RecordingTransport>>,
    refusal: String,
    connected: Mutex<Vec<String>>,
}

impl RecordingFactory {
    pub fn new(transport: Arc<RecordingTransport>) -> Arc<Self> {
        Arc::new(Self {
            transport: Some(transport),
            refusal: String::new(),
            connected: Mutex::new(Vec::new()),
        })
    }

    /// A factory whose `connect` always fails with `message`.
    pub fn refusing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            transport: None,
            refusal: message.to_string(),
            connected: Mutex::new(Vec::new()),
        })
    }

    pub fn connected(&self) -> Vec<String> {
        self.connected.lock().unwrap().clone()
    }
}

impl TransportFactory for RecordingFactory {
    fn connect(&self, base_url: &str) -> Result<Arc<dyn Transport>, TransportError> {
        self.connected.lock().unwrap().push(base_url.to_string());
        match &self.transport {
            Some(transport) => Ok(transport.clone()),
            None => Err(TransportError::new(self.refusal.clone())),
        }
    }
}

#[derive(Default)]
pub struct MemoryLog(Mutex<Vec<String>>);

impl MemoryLog {
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl LogSink for MemoryLog {
    fn line(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

/// A finished build with a fixed snapshot.
pub struct FakeRun {
    pub result: Option<BuildResult>,
    pub causes: Vec<Cause>,
    pub env: Result<EnvVars, HostError>,
    pub display_name: String,
    pub job: JobItem,
}

impl FakeRun {
    pub fn failed(env: EnvVars) -> Self {
        Self {
            result: Some(BuildResult::Failure),
            causes: vec![Cause::UserId {
                user_name: "alice".to_string(),
            }],
            env: Ok(env),
            display_name: "widgets #7".to_string(),
            job: JobItem::in_folder("widgets", JobItem::top_level("acme")),
        }
    }
}

impl BuildRun for FakeRun {
    fn result(&self) -> Option<BuildResult> {
        self.result
    }

    fn causes(&self) -> &[Cause] {
        &self.causes
    }

    fn environment(&self) -> Result<EnvVars, HostError> {
        self.env.clone()
    }

    fn full_display_name(&self) -> String {
        self.display_name.clone()
    }

    fn job(&self) -> &JobItem {
        &self.job
    }
}

#[derive(Debug, Error)]
#[error("C: connection reset by peer")]
struct ResetByPeer;

#[derive(Debug, Error)]
#[error("B: tls handshake failed")]
struct HandshakeFailed(#[source] ResetByPeer);

/// A transport error whose cause chain is `A -> B -> C`.
pub fn chained_error() -> TransportError {
    TransportError::with_source("A: request failed", HandshakeFailed(ResetByPeer))
}
