//! Core logger types and traits

pub mod error;
pub mod formatter;
pub mod handler;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod registry;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use formatter::Formatter;
pub use handler::{Handler, HandlerSlot, SharedHandler};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder, DEFAULT_ROOT_LEVEL};
pub use metrics::LoggerMetrics;
pub use registry::{Registry, ROOT_LOGGER_NAME};
pub use timestamp::TimestampFormat;
