use crate::allocator::ByteBufferAllocator;
use crate::logger::{Logger, LOG_TARGET, REQUEST_ID_KEY, TRACE_ID_KEY};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use std::fmt::{Debug, Formatter, Result};
use tokio::runtime::Handle;
use tracing::Span;

/// Context for a single function invocation.
///
/// Built by the runtime loop right after an invocation arrives and handed to
/// the handler by reference. Nothing in it changes after construction.
#[derive(Clone)]
pub struct ExecutionContext {
    /// Unique identifier of the invocation
    request_id: String,
    /// Distributed tracing header value
    trace_id: String,
    /// Identifier of the invoked function, alias or version
    invoked_function_arn: String,
    /// Wall-clock instant the invocation must finish by
    deadline: DateTime<Utc>,
    /// Set when the caller used an identity-federation client
    cognito_identity: Option<String>,
    /// Set when the caller supplied device or app metadata
    client_context: Option<String>,
    /// Caller's logger enriched with the request and trace ids
    logger: Logger,
    /// `invocation` span carrying the request and trace ids
    span: Span,
    /// Scheduler the invocation runs on; shared with the runtime
    event_loop: Handle,
    allocator: ByteBufferAllocator,
}

impl ExecutionContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        request_id: impl Into<String>,
        trace_id: impl Into<String>,
        invoked_function_arn: impl Into<String>,
        deadline: DateTime<Utc>,
        cognito_identity: Option<String>,
        client_context: Option<String>,
        logger: Logger,
        event_loop: Handle,
    ) -> Self {
        let request_id = request_id.into();
        let trace_id = trace_id.into();

        let logger = {
            let mut logger = logger;
            logger.set_metadata(REQUEST_ID_KEY, request_id.clone());
            logger.set_metadata(TRACE_ID_KEY, trace_id.clone());
            logger
        };

        let span = tracing::info_span!(
            target: LOG_TARGET,
            "invocation",
            awsRequestID = %request_id,
            awsTraceID = %trace_id
        );

        Self {
            request_id,
            trace_id,
            invoked_function_arn: invoked_function_arn.into(),
            deadline,
            cognito_identity,
            client_context,
            logger,
            span,
            event_loop,
            allocator: ByteBufferAllocator::new(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn invoked_function_arn(&self) -> &str {
        &self.invoked_function_arn
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn cognito_identity(&self) -> Option<&str> {
        self.cognito_identity.as_deref()
    }

    pub fn client_context(&self) -> Option<&str> {
        self.client_context.as_deref()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Span tagging records with the request and trace ids.
    ///
    /// Plain `tracing` calls inside `span.in_scope(..)`, or futures wrapped
    /// with `.instrument(span.clone())`, carry both ids. The span is bound to
    /// the subscriber that was current when the context was built.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Handle to the scheduler the invocation runs on.
    ///
    /// Continuations spawned here share the runtime's threads, so they must
    /// not block. The context never spawns on or shuts down this handle.
    pub fn event_loop(&self) -> &Handle {
        &self.event_loop
    }

    pub fn allocator(&self) -> ByteBufferAllocator {
        self.allocator
    }

    /// Time left until the deadline, measured against the current wall clock.
    ///
    /// Negative once the deadline has passed; the value is never clamped.
    pub fn remaining_time(&self) -> TimeDelta {
        self.remaining_time_at(Utc::now())
    }

    /// Time left until the deadline as seen from `now`, in whole milliseconds
    pub fn remaining_time_at(&self, now: DateTime<Utc>) -> TimeDelta {
        TimeDelta::milliseconds(self.deadline.timestamp_millis() - now.timestamp_millis())
    }

    /// Whether no time budget is left
    pub fn is_past_deadline(&self) -> bool {
        self.remaining_time() <= TimeDelta::zero()
    }
}

// Optional fields render as a bare `nil` rather than `None` or an empty string
struct Optional<'a>(Option<&'a str>);

impl Debug for Optional<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.0 {
            Some(value) => Debug::fmt(value, f),
            None => f.write_str("nil"),
        }
    }
}

// Instead of #[derive(Debug)]
impl Debug for ExecutionContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("ExecutionContext")
            .field("request_id", &self.request_id)
            .field("trace_id", &self.trace_id)
            .field("invoked_function_arn", &self.invoked_function_arn)
            .field("cognito_identity", &Optional(self.cognito_identity()))
            .field("client_context", &Optional(self.client_context()))
            .field(
                "deadline",
                &format_args!("{}", self.deadline.to_rfc3339_opts(SecondsFormat::Millis, true)),
            )
            .finish()
    }
}
