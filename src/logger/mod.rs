mod config;
mod core;

pub use config::{LoggerConfig, LOG_LABEL_VAR, LOG_LEVEL_VAR};
pub use self::core::{Logger, LOG_TARGET, REQUEST_ID_KEY, TRACE_ID_KEY};
