use super::error::{ConfigError, ContextError};

pub type ContextResult<T> = std::result::Result<T, ContextError>;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
