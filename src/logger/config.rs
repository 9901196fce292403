use super::Logger;
use crate::types::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Environment variable holding the minimum log level
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
/// Environment variable holding the logger label
pub const LOG_LABEL_VAR: &str = "LOG_LABEL";

/// Configuration for the base logger a runtime hands to each context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Label attached to every record
    #[serde(default = "default_label")]
    pub label: String,
    /// Most verbose level that gets emitted
    #[serde(default = "default_level", with = "level_filter")]
    pub level: LevelFilter,
}

fn default_label() -> String {
    "invocation".to_string()
}

fn default_level() -> LevelFilter {
    LevelFilter::INFO
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            level: default_level(),
        }
    }
}

impl LoggerConfig {
    /// Load from `LOG_LEVEL` and `LOG_LABEL`, falling back to defaults for unset variables
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// Levels are parsed by `LevelFilter`: `off`, `error`, `warn`, `info`,
    /// `debug`, `trace` in any case, or `0` to `5`.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(label) = lookup(LOG_LABEL_VAR).filter(|label| !label.trim().is_empty()) {
            config.label = label;
        }

        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            config.level = parse_level(&level)?;
        }

        Ok(config)
    }

    pub fn build_logger(&self) -> Logger {
        Logger::new(self.label.clone()).with_level(self.level)
    }
}

fn parse_level(value: &str) -> ConfigResult<LevelFilter> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidLogLevel(value.to_string()))
}

mod level_filter {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::level_filters::LevelFilter;

    pub fn serialize<S: Serializer>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(level)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LevelFilter, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_level(&value).map_err(D::Error::custom)
    }
}
