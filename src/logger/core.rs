use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::field::display;
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// Metadata key carrying the invocation's request id
pub const REQUEST_ID_KEY: &str = "awsRequestID";
/// Metadata key carrying the invocation's trace header
pub const TRACE_ID_KEY: &str = "awsTraceID";
/// Target of every event emitted through a [`Logger`]
pub const LOG_TARGET: &str = "invocation_context";

const DEFAULT_LABEL: &str = "invocation";

/// A structured logger value carrying fixed metadata.
///
/// Loggers are plain values: cloning one yields an independent copy whose
/// metadata can be changed without affecting the original. Records are
/// emitted through `tracing`, so whichever subscriber the runtime installed
/// decides where they end up. `awsRequestID` and `awsTraceID` are recorded as
/// fields of their own; any other entries go into a `metadata` JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    label: String,
    level: LevelFilter,
    metadata: BTreeMap<String, String>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}

impl Logger {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            level: LevelFilter::INFO,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn set_level(&mut self, level: LevelFilter) {
        self.level = level;
    }

    /// Insert or replace a metadata entry on this copy only
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Whether a record at `level` passes this logger's filter
    pub fn is_enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    /// Emit `message` at `level` with this logger's label and metadata attached
    pub fn log(&self, level: Level, message: impl Display) {
        if !self.is_enabled(level) {
            return;
        }

        let logger = self.label.as_str();
        let request_id = self.metadata_value(REQUEST_ID_KEY);
        let trace_id = self.metadata_value(TRACE_ID_KEY);
        let extra = self.extra_metadata();
        let metadata = extra.as_ref().map(display);

        // Field names mirror REQUEST_ID_KEY and TRACE_ID_KEY
        match level {
            Level::ERROR => tracing::error!(
                target: LOG_TARGET, logger, awsRequestID = request_id, awsTraceID = trace_id, metadata,
                "{}", message
            ),
            Level::WARN => tracing::warn!(
                target: LOG_TARGET, logger, awsRequestID = request_id, awsTraceID = trace_id, metadata,
                "{}", message
            ),
            Level::INFO => tracing::info!(
                target: LOG_TARGET, logger, awsRequestID = request_id, awsTraceID = trace_id, metadata,
                "{}", message
            ),
            Level::DEBUG => tracing::debug!(
                target: LOG_TARGET, logger, awsRequestID = request_id, awsTraceID = trace_id, metadata,
                "{}", message
            ),
            _ => tracing::trace!(
                target: LOG_TARGET, logger, awsRequestID = request_id, awsTraceID = trace_id, metadata,
                "{}", message
            ),
        }
    }

    pub fn trace(&self, message: impl Display) {
        self.log(Level::TRACE, message);
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Level::DEBUG, message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(Level::INFO, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.log(Level::WARN, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Level::ERROR, message);
    }

    // Entries other than the two id keys, or None when there are none
    fn extra_metadata(&self) -> Option<Value> {
        let map: Map<String, Value> = self
            .metadata
            .iter()
            .filter(|(key, _)| key.as_str() != REQUEST_ID_KEY && key.as_str() != TRACE_ID_KEY)
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();

        (!map.is_empty()).then_some(Value::Object(map))
    }
}
