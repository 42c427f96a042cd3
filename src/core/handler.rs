//! Handler trait for log output destinations

use super::{error::Result, formatter::Formatter, log_level::LogLevel, log_record::LogRecord};
use parking_lot::Mutex;
use std::sync::Arc;

/// A sink that writes already-formatted lines.
///
/// Level gating and formatting happen in [`HandlerSlot`]; implementations
/// only deal with the medium.
pub trait Handler: Send {
    fn emit(&mut self, record: &LogRecord, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn kind(&self) -> &str;
}

/// A named handler as declared in a configuration document.
///
/// Holds the handler's own level threshold and formatter. The sink sits
/// behind one lock that is held for exactly one record's write.
pub struct HandlerSlot {
    name: String,
    level: LogLevel,
    formatter: Arc<Formatter>,
    sink: Mutex<Box<dyn Handler>>,
}

pub type SharedHandler = Arc<HandlerSlot>;

impl HandlerSlot {
    pub fn new(
        name: impl Into<String>,
        level: LogLevel,
        formatter: Arc<Formatter>,
        sink: Box<dyn Handler>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            formatter,
            sink: Mutex::new(sink),
        }
    }

    #[must_use]
    pub fn shared(self) -> SharedHandler {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn formatter(&self) -> &Arc<Formatter> {
        &self.formatter
    }

    pub fn kind(&self) -> String {
        self.sink.lock().kind().to_string()
    }

    /// Format and write the record if it clears this handler's level.
    ///
    /// Returns `Ok(false)` when the record was below the threshold.
    pub fn handle(&self, record: &LogRecord) -> Result<bool> {
        if record.level < self.level {
            return Ok(false);
        }

        let line = self.formatter.format(record);
        let mut sink = self.sink.lock();
        sink.emit(record, &line)?;
        Ok(true)
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }
}

impl std::fmt::Debug for HandlerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSlot")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("template", &self.formatter.template())
            .finish()
    }
}
