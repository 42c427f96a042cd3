//! # Pipeline Logger
//!
//! Declarative, file-configured logging for a bronze/silver/gold data
//! pipeline.
//!
//! A YAML (or JSON) document names formatters, handlers and loggers; the
//! loader validates it and builds a [`Registry`] of named loggers arranged
//! by their dotted names. Records flow from the logger they were emitted on
//! to its handlers and, while `propagate` is set, to every ancestor's
//! handlers up to root.
//!
//! ## Features
//!
//! - **Declarative**: formatters, handlers and loggers come from a document
//! - **Two thresholds**: a logger's effective level, then each handler's level
//! - **Propagation control**: per logger, so layer logs never leak into root
//! - **Thread Safe**: handlers serialize their own writes
//!
//! ## Example
//!
//! ```no_run
//! use pipeline_logger::pipeline;
//!
//! let bronze = pipeline::bronze_logger().expect("logging configured");
//! bronze.info("Fetching data from https://api.stlouisfed.org");
//! ```

pub mod config;
pub mod core;
pub mod handlers;
pub mod macros;
pub mod pipeline;
pub mod setup;

pub mod prelude {
    pub use crate::config::{LoadOptions, LoggingConfig};
    pub use crate::core::{
        Formatter, Handler, HandlerSlot, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, Registry, Result, SharedHandler, TimestampFormat,
    };
    pub use crate::handlers::{FileHandler, FileMode, StreamHandler, StreamTarget};
    pub use crate::pipeline::Layer;
    pub use crate::setup::{get_logger, setup_logging, LoggingSetup};
}

pub use config::{LoadOptions, LoggingConfig};
pub use core::{
    Formatter, Handler, HandlerSlot, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, Registry, Result, SharedHandler, TimestampFormat, DEFAULT_ROOT_LEVEL,
    ROOT_LOGGER_NAME,
};
pub use handlers::{FileHandler, FileMode, StreamHandler, StreamTarget};
pub use setup::{get_logger, setup_logging, shutdown, LoggingSetup};
