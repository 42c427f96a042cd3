//! Named logger implementation
//!
//! A [`Logger`] gates records by its effective level, hands them to its own
//! handlers, and then, if its propagation flag is set, to its parent's
//! handlers, continuing up to the root.

use super::{
    error::Result,
    handler::SharedHandler,
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Effective level of a logger with no level anywhere up its chain
pub const DEFAULT_ROOT_LEVEL: LogLevel = LogLevel::Warning;

pub struct Logger {
    name: String,
    /// `None` means "inherit from the parent"
    level: RwLock<Option<LogLevel>>,
    handlers: RwLock<Vec<SharedHandler>>,
    propagate: AtomicBool,
    parent: RwLock<Option<Arc<Logger>>>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Create a detached logger with no level, no handlers and propagation on
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_metrics(name, Arc::new(LoggerMetrics::new()))
    }

    pub(crate) fn with_metrics(name: impl Into<String>, metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            name: name.into(),
            level: RwLock::new(None),
            handlers: RwLock::new(Vec::new()),
            propagate: AtomicBool::new(true),
            parent: RwLock::new(None),
            metrics,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The level set on this logger itself, if any
    pub fn level(&self) -> Option<LogLevel> {
        *self.level.read()
    }

    pub fn set_level(&self, level: Option<LogLevel>) {
        *self.level.write() = level;
    }

    /// First level found walking from this logger towards the root
    pub fn effective_level(&self) -> LogLevel {
        if let Some(level) = self.level() {
            return level;
        }
        let mut parent = self.parent();
        while let Some(logger) = parent {
            if let Some(level) = logger.level() {
                return level;
            }
            parent = logger.parent();
        }
        DEFAULT_ROOT_LEVEL
    }

    #[inline]
    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        level >= self.effective_level()
    }

    pub fn propagate(&self) -> bool {
        self.propagate.load(Ordering::Relaxed)
    }

    pub fn set_propagate(&self, propagate: bool) {
        self.propagate.store(propagate, Ordering::Relaxed);
    }

    pub fn parent(&self) -> Option<Arc<Logger>> {
        self.parent.read().clone()
    }

    pub(crate) fn set_parent(&self, parent: Option<Arc<Logger>>) {
        *self.parent.write() = parent;
    }

    pub fn add_handler(&self, handler: SharedHandler) {
        self.handlers.write().push(handler);
    }

    pub fn handlers(&self) -> Vec<SharedHandler> {
        self.handlers.read().clone()
    }

    pub fn handler_names(&self) -> Vec<String> {
        self.handlers
            .read()
            .iter()
            .map(|handler| handler.name().to_string())
            .collect()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled_for(level) {
            self.metrics.record_filtered();
            return;
        }

        let record = LogRecord::new(&self.name, level, message.into());
        self.dispatch(&record);
    }

    /// Route a pre-built record (e.g. one carrying a source location)
    pub fn log_record(&self, record: LogRecord) {
        if !self.is_enabled_for(record.level) {
            self.metrics.record_filtered();
            return;
        }
        self.dispatch(&record);
    }

    /// Hand the record to this logger's handlers and, while propagation
    /// allows, to every ancestor's handlers.
    fn dispatch(&self, record: &LogRecord) {
        let mut found = self.call_handlers(record);
        let mut propagate = self.propagate();
        let mut parent = self.parent();

        while propagate {
            let Some(logger) = parent else {
                break;
            };
            found += logger.call_handlers(record);
            propagate = logger.propagate();
            parent = logger.parent();
        }

        if found == 0 {
            self.metrics.record_unhandled();
            if record.level >= LogLevel::Warning {
                eprintln!("{}", record.message);
            }
        }
    }

    /// Process a record with per-handler panic isolation
    ///
    /// One failing handler never prevents the others from receiving the
    /// record. Returns the number of handlers attached to this logger.
    fn call_handlers(&self, record: &LogRecord) -> usize {
        let handlers = self.handlers.read();

        for handler in handlers.iter() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler.handle(record)
            }));

            match result {
                Ok(Ok(true)) => {
                    self.metrics.record_emitted();
                }
                Ok(Ok(false)) => {
                    // Below the handler's own level
                }
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Handler '{}' failed for logger '{}': {}",
                        handler.name(),
                        self.name,
                        e
                    );
                    self.metrics.record_failed();
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Handler '{}' panicked: {}. \
                         Other handlers continue to function.",
                        handler.name(),
                        panic_msg
                    );
                    self.metrics.record_failed();
                }
            }
        }

        handlers.len()
    }

    /// Flush this logger's own handlers
    pub fn flush(&self) -> Result<()> {
        for handler in self.handlers.read().iter() {
            handler.flush()?;
        }
        Ok(())
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Critical, message);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("handlers", &self.handler_names())
            .field("propagate", &self.propagate())
            .finish()
    }
}

/// Builder for constructing a standalone Logger with a fluent API
///
/// # Example
/// ```
/// use pipeline_logger::prelude::*;
///
/// let console = HandlerSlot::new(
///     "console",
///     LogLevel::Info,
///     Formatter::default().shared(),
///     Box::new(StreamHandler::stdout()),
/// )
/// .shared();
///
/// let logger = Logger::builder("data_pipeline")
///     .level(LogLevel::Info)
///     .handler(console)
///     .propagate(false)
///     .build();
///
/// assert!(logger.is_enabled_for(LogLevel::Error));
/// ```
pub struct LoggerBuilder {
    name: String,
    level: Option<LogLevel>,
    handlers: Vec<SharedHandler>,
    propagate: bool,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: None,
            handlers: Vec::new(),
            propagate: true,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn handler(mut self, handler: SharedHandler) -> Self {
        self.handlers.push(handler);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    pub fn build(self) -> Logger {
        let logger = Logger::new(self.name);
        logger.set_level(self.level);
        logger.set_propagate(self.propagate);
        for handler in self.handlers {
            logger.add_handler(handler);
        }
        logger
    }
}

impl Logger {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Formatter, Handler, HandlerSlot, LoggerError};
    use parking_lot::Mutex;

    struct Capture(Arc<Mutex<Vec<String>>>);

    impl Handler for Capture {
        fn emit(&mut self, _record: &LogRecord, line: &str) -> Result<()> {
            self.0.lock().push(line.to_string());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn kind(&self) -> &str {
            "capture"
        }
    }

    struct Failing;

    impl Handler for Failing {
        fn emit(&mut self, _record: &LogRecord, _line: &str) -> Result<()> {
            Err(LoggerError::other("Simulated failure"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn kind(&self) -> &str {
            "failing"
        }
    }

    struct Panicking;

    impl Handler for Panicking {
        fn emit(&mut self, _record: &LogRecord, _line: &str) -> Result<()> {
            panic!("handler exploded");
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn kind(&self) -> &str {
            "panicking"
        }
    }

    fn capture(name: &str, level: LogLevel) -> (SharedHandler, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let slot = HandlerSlot::new(
            name,
            level,
            Formatter::default().shared(),
            Box::new(Capture(Arc::clone(&lines))),
        )
        .shared();
        (slot, lines)
    }

    #[test]
    fn test_detached_logger_defaults() {
        let logger = Logger::new("orphan");
        assert_eq!(logger.level(), None);
        assert_eq!(logger.effective_level(), DEFAULT_ROOT_LEVEL);
        assert!(logger.propagate());
        assert!(logger.parent().is_none());
    }

    #[test]
    fn test_logger_level_gate() {
        let (handler, lines) = capture("all", LogLevel::Debug);
        let logger = Logger::builder("data_pipeline")
            .level(LogLevel::Info)
            .handler(handler)
            .build();

        logger.debug("hidden");
        logger.info("shown");

        assert_eq!(*lines.lock(), vec!["shown".to_string()]);
        assert_eq!(logger.metrics().filtered_count(), 1);
        assert_eq!(logger.metrics().emitted_count(), 1);
    }

    #[test]
    fn test_effective_level_inherited_from_parent() {
        let parent = Arc::new(Logger::builder("data_pipeline").level(LogLevel::Error).build());
        let child = Logger::new("data_pipeline.fred");
        child.set_parent(Some(Arc::clone(&parent)));

        assert_eq!(child.effective_level(), LogLevel::Error);
        child.set_level(Some(LogLevel::Debug));
        assert_eq!(child.effective_level(), LogLevel::Debug);
    }

    #[test]
    fn test_propagation_gate() {
        let (parent_handler, parent_lines) = capture("parent", LogLevel::Debug);
        let parent = Arc::new(
            Logger::builder("root")
                .level(LogLevel::Debug)
                .handler(parent_handler)
                .build(),
        );

        let (child_handler, child_lines) = capture("child", LogLevel::Debug);
        let child = Logger::builder("child")
            .level(LogLevel::Debug)
            .handler(child_handler)
            .build();
        child.set_parent(Some(Arc::clone(&parent)));

        child.info("one");
        child.set_propagate(false);
        child.info("two");

        assert_eq!(*child_lines.lock(), vec!["one".to_string(), "two".to_string()]);
        assert_eq!(*parent_lines.lock(), vec!["one".to_string()]);
    }

    #[test]
    fn test_failing_handler_is_isolated() {
        let (good, lines) = capture("good", LogLevel::Debug);
        let logger = Logger::builder("isolated").level(LogLevel::Debug).build();
        logger.add_handler(
            HandlerSlot::new("bad", LogLevel::Debug, Formatter::default().shared(), Box::new(Failing))
                .shared(),
        );
        logger.add_handler(
            HandlerSlot::new(
                "boom",
                LogLevel::Debug,
                Formatter::default().shared(),
                Box::new(Panicking),
            )
            .shared(),
        );
        logger.add_handler(good);

        for _ in 0..3 {
            logger.info("still delivered");
        }

        assert_eq!(lines.lock().len(), 3);
        assert_eq!(logger.metrics().failed_count(), 6);
        assert_eq!(logger.metrics().emitted_count(), 3);
    }

    #[test]
    fn test_unhandled_records_counted() {
        let logger = Logger::builder("lonely").level(LogLevel::Debug).build();
        logger.info("nobody listens");
        assert_eq!(logger.metrics().unhandled_count(), 1);
    }

    #[test]
    fn test_handler_names_in_order() {
        let (a, _) = capture("console", LogLevel::Info);
        let (b, _) = capture("pipeline_file", LogLevel::Info);
        let (c, _) = capture("error_file", LogLevel::Error);
        let logger = Logger::builder("data_pipeline")
            .handler(a)
            .handler(b)
            .handler(c)
            .build();

        assert_eq!(
            logger.handler_names(),
            vec!["console", "pipeline_file", "error_file"]
        );
    }
}
