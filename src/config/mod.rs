//! Logging configuration documents and their loader

pub mod loader;
pub mod schema;

pub use loader::LoadOptions;
pub use schema::{
    parse_flag, FormatterConfig, HandlerClass, HandlerConfig, LevelValue, LoggerConfig,
    LoggingConfig, RootConfig, SUPPORTED_VERSION,
};
