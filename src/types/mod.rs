mod error;
mod result;

pub use error::{ConfigError, ContextError};
pub use result::{ConfigResult, ContextResult};
