mod builder;
mod core;

pub use builder::ContextBuilder;
pub use self::core::ExecutionContext;
