use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for assembling an execution context from loose parts
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ContextError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid deadline: {0}ms is outside the representable range")]
    InvalidDeadline(i64),

    #[error("No event loop: builder was given no handle and no tokio runtime is active")]
    NoEventLoop,
}

/// Error type for logger configuration
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ConfigError {
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
