//! Record formatting
//!
//! A [`Formatter`] turns a [`LogRecord`] into one line of text using a
//! `%(field)s` template, e.g.
//! `%(asctime)s - %(name)s - %(levelname)s - %(message)s`.
//!
//! Templates are parsed once when the formatter is built; unknown fields and
//! malformed placeholders are rejected at that point.

use super::error::{LoggerError, Result};
use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use std::sync::Arc;

/// Record attribute a placeholder refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AscTime,
    Name,
    LevelName,
    LevelNo,
    Message,
    Thread,
    ThreadName,
    Process,
    Filename,
    PathName,
    LineNo,
    Module,
}

impl Field {
    fn parse(key: &str) -> Option<Self> {
        Some(match key {
            "asctime" => Field::AscTime,
            "name" => Field::Name,
            "levelname" => Field::LevelName,
            "levelno" => Field::LevelNo,
            "message" => Field::Message,
            "thread" => Field::Thread,
            "threadName" => Field::ThreadName,
            "process" => Field::Process,
            "filename" => Field::Filename,
            "pathname" => Field::PathName,
            "lineno" => Field::LineNo,
            "module" => Field::Module,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder {
        field: Field,
        width: usize,
        left_align: bool,
    },
}

/// Compiled record template plus its timestamp format
#[derive(Debug, Clone)]
pub struct Formatter {
    template: String,
    segments: Vec<Segment>,
    timestamp_format: TimestampFormat,
    uses_time: bool,
}

impl Formatter {
    pub const DEFAULT_TEMPLATE: &'static str = "%(message)s";

    /// Compile a template
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeline_logger::core::{Formatter, LogLevel, LogRecord, TimestampFormat};
    ///
    /// let formatter = Formatter::new("%(levelname)s: %(message)s", TimestampFormat::Standard).unwrap();
    /// let record = LogRecord::new("data_pipeline", LogLevel::Info, "started".to_string());
    /// assert_eq!(formatter.format(&record), "INFO: started");
    /// ```
    pub fn new(template: &str, timestamp_format: TimestampFormat) -> Result<Self> {
        timestamp_format.validate()?;
        let segments = parse_template(template)?;
        let uses_time = segments.iter().any(|segment| {
            matches!(
                segment,
                Segment::Placeholder {
                    field: Field::AscTime,
                    ..
                }
            )
        });

        Ok(Self {
            template: template.to_string(),
            segments,
            timestamp_format,
            uses_time,
        })
    }

    /// Build from the optional `format` / `datefmt` pair of a document
    pub fn from_config(format: Option<&str>, datefmt: Option<&str>) -> Result<Self> {
        Self::new(
            format.unwrap_or(Self::DEFAULT_TEMPLATE),
            TimestampFormat::from_datefmt(datefmt)?,
        )
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    /// Whether the template renders `%(asctime)s`
    pub fn uses_time(&self) -> bool {
        self.uses_time
    }

    /// Render a record into a single line (no trailing newline)
    pub fn format(&self, record: &LogRecord) -> String {
        let asctime = if self.uses_time {
            self.timestamp_format.format(&record.timestamp)
        } else {
            String::new()
        };

        let mut output = String::with_capacity(self.template.len() + record.message.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder {
                    field,
                    width,
                    left_align,
                } => {
                    let value = match field {
                        Field::AscTime => asctime.clone(),
                        Field::Name => record.logger_name.clone(),
                        Field::LevelName => record.level.to_str().to_string(),
                        Field::LevelNo => record.level.as_number().to_string(),
                        Field::Message => record.message.clone(),
                        Field::Thread => record.thread_id.clone(),
                        Field::ThreadName => record
                            .thread_name
                            .clone()
                            .unwrap_or_else(|| record.thread_id.clone()),
                        Field::Process => record.process_id.to_string(),
                        Field::Filename => record
                            .file
                            .as_deref()
                            .map(|file| file.rsplit(['/', '\\']).next().unwrap_or(file).to_string())
                            .unwrap_or_default(),
                        Field::PathName => record.file.clone().unwrap_or_default(),
                        Field::LineNo => record.line.map(|l| l.to_string()).unwrap_or_default(),
                        Field::Module => record.module_path.clone().unwrap_or_default(),
                    };
                    if *left_align {
                        output.push_str(&format!("{:<width$}", value, width = *width));
                    } else {
                        output.push_str(&format!("{:>width$}", value, width = *width));
                    }
                }
            }
        }
        output
    }

    /// Wrap this formatter in an Arc for sharing across handlers
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            template: Self::DEFAULT_TEMPLATE.to_string(),
            segments: vec![Segment::Placeholder {
                field: Field::Message,
                width: 0,
                left_align: false,
            }],
            timestamp_format: TimestampFormat::Standard,
            uses_time: false,
        }
    }
}

fn template_error(template: &str, message: impl std::fmt::Display) -> LoggerError {
    LoggerError::schema(format!("invalid format '{}': {}", template, message))
}

fn parse_template(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        match chars.next() {
            Some('%') => literal.push('%'),
            Some('(') => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some(')') => break,
                        Some(ch) => key.push(ch),
                        None => return Err(template_error(template, "unterminated placeholder")),
                    }
                }
                let field = Field::parse(&key)
                    .ok_or_else(|| template_error(template, format!("unknown field '{}'", key)))?;

                let left_align = chars.next_if_eq(&'-').is_some();
                let mut width = 0usize;
                while let Some(digit) = chars.next_if(|ch| ch.is_ascii_digit()) {
                    width = width * 10 + digit.to_digit(10).map(|d| d as usize).unwrap_or(0);
                }

                match chars.next() {
                    Some('s') | Some('d') => {}
                    Some(other) => {
                        return Err(template_error(
                            template,
                            format!("unsupported conversion '{}'", other),
                        ))
                    }
                    None => return Err(template_error(template, "missing conversion")),
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder {
                    field,
                    width,
                    left_align,
                });
            }
            Some(other) => {
                return Err(template_error(
                    template,
                    format!("unexpected '%{}'", other),
                ))
            }
            None => return Err(template_error(template, "trailing '%'")),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
