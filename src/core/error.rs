//! Error types for the logging system

use std::path::Path;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Malformed or unsupported configuration document
    #[error("Invalid logging configuration: {message}")]
    Schema { message: String },

    /// Handler class that has no implementation
    #[error("Unknown handler class '{class}' for handler '{handler}'")]
    UnknownHandlerClass { handler: String, class: String },

    /// Level name or number that does not map to a severity
    #[error("Invalid level '{value}' for {component}")]
    InvalidLevel { component: String, value: String },

    /// YAML document could not be parsed into the schema
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON document could not be parsed into the schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Logger refers to a handler that is not declared
    #[error("Logger '{logger}' refers to undeclared handler '{handler}'")]
    UnknownHandler { logger: String, handler: String },

    /// Handler refers to a formatter that is not declared
    #[error("Handler '{handler}' refers to undeclared formatter '{formatter}'")]
    UnknownFormatter { handler: String, formatter: String },

    /// File handler could not open or write its file
    #[error("File handler error for '{path}': {message}")]
    FileHandler { path: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither an explicit path nor `LOGGING_CONFIG_PATH` was given
    #[error("Logging configuration path is not set. Ensure the LOGGING_CONFIG_PATH environment variable is defined.")]
    ConfigPathUnset,

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    Writer(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        LoggerError::Schema {
            message: message.into(),
        }
    }

    pub fn unknown_handler_class(handler: impl Into<String>, class: impl Into<String>) -> Self {
        LoggerError::UnknownHandlerClass {
            handler: handler.into(),
            class: class.into(),
        }
    }

    pub fn invalid_level(component: impl Into<String>, value: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            component: component.into(),
            value: value.into(),
        }
    }

    /// Create a reference error for a logger's handler list
    pub fn unknown_handler(logger: impl Into<String>, handler: impl Into<String>) -> Self {
        LoggerError::UnknownHandler {
            logger: logger.into(),
            handler: handler.into(),
        }
    }

    /// Create a reference error for a handler's formatter
    pub fn unknown_formatter(handler: impl Into<String>, formatter: impl Into<String>) -> Self {
        LoggerError::UnknownFormatter {
            handler: handler.into(),
            formatter: formatter.into(),
        }
    }

    /// Create a file handler error
    pub fn file_handler(path: &Path, message: impl Into<String>) -> Self {
        LoggerError::FileHandler {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::Writer(msg.into())
    }

    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Malformed structure, unknown key, unknown class or bad value
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            LoggerError::Schema { .. }
                | LoggerError::UnknownHandlerClass { .. }
                | LoggerError::InvalidLevel { .. }
                | LoggerError::Yaml(_)
                | LoggerError::Json(_)
        )
    }

    /// Handler or formatter name that does not resolve
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            LoggerError::UnknownHandler { .. } | LoggerError::UnknownFormatter { .. }
        )
    }

    /// Sink that cannot be opened or written
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            LoggerError::FileHandler { .. } | LoggerError::IoOperation { .. } | LoggerError::Io(_)
        )
    }
}
