//! Explicit `hubotSend`-style pipeline step.

use std::sync::Arc;

use hubot::{
    resolve_step, resolve_user, AttemptId, Cause, Configuration, EnvVars, LogSink,
    NotificationResult, StepAbort, StepParameters, Transport, TransportError, TransportFactory,
};
use tracing::{field, instrument, warn, Span};

use crate::dispatcher::{connect_failed, deliver, NotificationDispatcher};

/// What the host hands to a running step.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub env: &'a EnvVars,
    /// Causes of the build running the step.
    pub causes: &'a [Cause],
    pub log: &'a dyn LogSink,
}

/// One execution of the explicit notification step.
///
/// The transport client is created from the resolved URL on first use and
/// reused afterwards, unless one was preset with [`Self::with_transport`].
pub struct ExplicitStepExecution {
    dispatcher: NotificationDispatcher,
    transport: Option<Arc<dyn Transport>>,
}

impl ExplicitStepExecution {
    pub fn new(factory: Arc<dyn TransportFactory>) -> Self {
        Self {
            dispatcher: NotificationDispatcher::new(factory),
            transport: None,
        }
    }

    /// Uses `transport` instead of creating one from the configured URL.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Runs the step.
    ///
    /// Configuration errors come back as an unsuccessful result. A failed
    /// delivery is returned as well, unless the effective fail-on-error policy
    /// is set, in which case the step aborts with the error body.
    #[instrument(
        name = "hubot.step",
        skip_all,
        fields(attempt_id = %AttemptId::new_random(), room = field::Empty, user = field::Empty)
    )]
    pub async fn run(
        &mut self,
        ctx: StepContext<'_>,
        params: &StepParameters,
    ) -> Result<NotificationResult, StepAbort> {
        let config = match resolve_step(ctx.env, params) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "hubot step configuration is incomplete");
                ctx.log.line(&format!("Hubot: {err}"));
                return Ok(NotificationResult::local_failure(err.to_string()));
            }
        };

        let span = Span::current();
        span.record("room", config.room.as_str());
        span.record("user", resolve_user(ctx.causes, ctx.env).as_str());

        // `message` is always set for explicit steps once resolution succeeds.
        let message = config.message.as_deref().unwrap_or_default();
        let result = match self.transport(&config) {
            Ok(transport) => deliver(transport.as_ref(), &config.room, message, ctx.log).await,
            Err(err) => connect_failed(&err, &config.room, ctx.log),
        };

        if !result.successful && config.fail_on_error {
            return Err(StepAbort {
                message: result.error_message().to_string(),
            });
        }
        Ok(result)
    }

    fn transport(&mut self, config: &Configuration) -> Result<Arc<dyn Transport>, TransportError> {
        if let Some(transport) = &self.transport {
            return Ok(transport.clone());
        }
        let transport = self.dispatcher.connect(config)?;
        self.transport = Some(transport.clone());
        Ok(transport)
    }
}
