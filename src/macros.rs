//! Logging macros for ergonomic log message formatting.
//!
//! These macros format like `format!`, skip formatting entirely when the
//! logger would filter the level, and attach the call site (file, line,
//! module) to the record so `%(filename)s`, `%(lineno)d` and `%(module)s`
//! can render it.
//!
//! # Examples
//!
//! ```
//! use pipeline_logger::prelude::*;
//! use pipeline_logger::info;
//!
//! let logger = Logger::new("data_pipeline");
//!
//! info!(logger, "Pipeline started");
//!
//! let series = "GDP";
//! info!(logger, "Fetching series {}", series);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use pipeline_logger::prelude::*;
/// # let logger = Logger::new("data_pipeline");
/// use pipeline_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Status code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled_for(level) {
            logger.log_record(
                $crate::LogRecord::new(logger.name(), level, format!($($arg)+))
                    .with_location(file!(), line!(), module_path!()),
            );
        }
    }};
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use pipeline_logger::prelude::*;
/// # let logger = Logger::new("data_pipeline_bronze");
/// use pipeline_logger::info;
/// info!(logger, "Fetching data from {}", "https://api.stlouisfed.org");
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use pipeline_logger::prelude::*;
/// # let logger = Logger::new("data_pipeline_bronze");
/// use pipeline_logger::error;
/// error!(logger, "{} API key is missing", "API_FREDAPI_KEY");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
