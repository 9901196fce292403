//! Per-invocation execution context for serverless function handlers.
//!
//! A runtime loop builds one [`ExecutionContext`] per invocation and passes it
//! to the handler by reference. The context carries the request and trace
//! identifiers, the wall-clock deadline, a logger enriched with those
//! identifiers, and a handle to the event loop the invocation runs on.

pub mod allocator;
pub mod context;
pub mod logger;
pub mod types;

pub mod prelude {
    //! Convenient re-exports of commonly used types
    pub use crate::allocator::ByteBufferAllocator;
    pub use crate::context::{ContextBuilder, ExecutionContext};
    pub use crate::logger::{Logger, LoggerConfig, REQUEST_ID_KEY, TRACE_ID_KEY};
    pub use crate::types::{ConfigError, ConfigResult, ContextError, ContextResult};
    pub use tracing::level_filters::LevelFilter;
}

// Re-export main types
pub use prelude::*;
