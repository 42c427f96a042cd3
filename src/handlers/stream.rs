//! Console handler implementation

use crate::core::{Handler, LogRecord, LoggerError, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;
use std::str::FromStr;

/// Standard stream a [`StreamHandler`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamTarget {
    Stdout,
    #[default]
    Stderr,
}

impl StreamTarget {
    pub fn to_str(&self) -> &'static str {
        match self {
            StreamTarget::Stdout => "stdout",
            StreamTarget::Stderr => "stderr",
        }
    }
}

impl FromStr for StreamTarget {
    type Err = String;

    /// Accepts `ext://sys.stdout`, `sys.stdout` and `stdout` (same for stderr)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix("ext://").unwrap_or(name);
        let name = name.strip_prefix("sys.").unwrap_or(name);
        match name.to_lowercase().as_str() {
            "stdout" => Ok(StreamTarget::Stdout),
            "stderr" => Ok(StreamTarget::Stderr),
            _ => Err(format!("Unknown stream: '{}'", s)),
        }
    }
}

pub struct StreamHandler {
    target: StreamTarget,
    use_colors: bool,
}

impl StreamHandler {
    pub fn new(target: StreamTarget) -> Self {
        Self {
            target,
            use_colors: false,
        }
    }

    pub fn stdout() -> Self {
        Self::new(StreamTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(StreamTarget::Stderr)
    }

    /// Color whole lines by level when writing to a terminal
    ///
    /// # Example
    ///
    /// ```
    /// use pipeline_logger::handlers::StreamHandler;
    ///
    /// let handler = StreamHandler::stdout().with_colors(true);
    /// ```
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn target(&self) -> StreamTarget {
        self.target
    }

    #[cfg(feature = "console")]
    fn render(&self, record: &LogRecord, line: &str) -> String {
        if self.use_colors {
            line.color(record.level.color_code()).to_string()
        } else {
            line.to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn render(&self, _record: &LogRecord, line: &str) -> String {
        line.to_string()
    }
}

impl Default for StreamHandler {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Handler for StreamHandler {
    fn emit(&mut self, record: &LogRecord, line: &str) -> Result<()> {
        let output = self.render(record, line);
        let written = match self.target {
            StreamTarget::Stdout => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{}", output).and_then(|_| out.flush())
            }
            StreamTarget::Stderr => {
                let mut err = std::io::stderr().lock();
                writeln!(err, "{}", output).and_then(|_| err.flush())
            }
        };
        written.map_err(|e| {
            LoggerError::io_operation(
                format!("writing to {}", self.target.to_str()),
                "console write failed",
                e,
            )
        })
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            StreamTarget::Stdout => std::io::stdout().flush()?,
            StreamTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn kind(&self) -> &str {
        "stream"
    }
}
