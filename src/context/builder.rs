use super::ExecutionContext;
use crate::logger::Logger;
use crate::types::{ContextError, ContextResult};
use chrono::{DateTime, Utc};
use tokio::runtime::Handle;

#[derive(Debug, Clone, Copy)]
enum Deadline {
    At(DateTime<Utc>),
    Millis(i64),
}

/// Builder for an execution context assembled field by field
#[derive(Debug, Default)]
pub struct ContextBuilder {
    request_id: Option<String>,
    trace_id: Option<String>,
    invoked_function_arn: Option<String>,
    deadline: Option<Deadline>,
    cognito_identity: Option<String>,
    client_context: Option<String>,
    logger: Option<Logger>,
    event_loop: Option<Handle>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn invoked_function_arn(mut self, arn: impl Into<String>) -> Self {
        self.invoked_function_arn = Some(arn.into());
        self
    }

    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(Deadline::At(deadline));
        self
    }

    /// Deadline as milliseconds since the Unix epoch
    pub fn deadline_ms(mut self, millis: i64) -> Self {
        self.deadline = Some(Deadline::Millis(millis));
        self
    }

    pub fn cognito_identity(mut self, identity: impl Into<String>) -> Self {
        self.cognito_identity = Some(identity.into());
        self
    }

    pub fn client_context(mut self, client_context: impl Into<String>) -> Self {
        self.client_context = Some(client_context.into());
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn event_loop(mut self, handle: Handle) -> Self {
        self.event_loop = Some(handle);
        self
    }

    /// Build the context.
    ///
    /// Falls back to `Logger::default()` and the ambient tokio runtime when
    /// those were not given.
    pub fn build(self) -> ContextResult<ExecutionContext> {
        let request_id = required(self.request_id, "request_id")?;
        let trace_id = required(self.trace_id, "trace_id")?;
        let invoked_function_arn = required(self.invoked_function_arn, "invoked_function_arn")?;

        let deadline = match required(self.deadline, "deadline")? {
            Deadline::At(at) => at,
            Deadline::Millis(millis) => DateTime::from_timestamp_millis(millis)
                .ok_or(ContextError::InvalidDeadline(millis))?,
        };

        let event_loop = match self.event_loop {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| ContextError::NoEventLoop)?,
        };

        Ok(ExecutionContext::new(
            request_id,
            trace_id,
            invoked_function_arn,
            deadline,
            self.cognito_identity,
            self.client_context,
            self.logger.unwrap_or_default(),
            event_loop,
        ))
    }
}

fn required<T>(value: Option<T>, field: &str) -> ContextResult<T> {
    value.ok_or_else(|| ContextError::MissingField(field.to_string()))
}
