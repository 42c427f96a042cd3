//! Timestamp formatting utilities
//!
//! Provides the `asctime` rendering used by formatters. Documents either
//! leave the date format out (the conventional `2025-01-08 10:30:45,123`
//! layout is used) or give a strftime string via `datefmt`.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use pipeline_logger::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// let format = TimestampFormat::Custom("%Y-%m-%d %H:%M:%S".to_string());
/// assert_eq!(format.format(&at), "2025-01-08 10:30:45");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Date, time and milliseconds after a comma: `2025-01-08 10:30:45,123`
    #[default]
    Standard,

    /// ISO 8601 with milliseconds and offset: `2025-01-08T10:30:45.123+00:00`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Custom strftime format
    ///
    /// Must pass [`TimestampFormat::validate`] before use; formatting an
    /// invalid pattern is rejected at load time rather than at write time.
    Custom(String),
}

impl TimestampFormat {
    /// Build a format from an optional `datefmt` value, validating custom patterns
    pub fn from_datefmt(datefmt: Option<&str>) -> Result<Self> {
        let format = match datefmt {
            None => TimestampFormat::Standard,
            Some(pattern) => TimestampFormat::Custom(pattern.to_string()),
        };
        format.validate()?;
        Ok(format)
    }

    /// Reject strftime patterns chrono cannot render
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(pattern) = self {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::schema(format!(
                    "invalid date format '{}'",
                    pattern
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            TimestampFormat::Standard => datetime.format("%Y-%m-%d %H:%M:%S,%3f").to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Custom(pattern) => datetime.format(pattern).to_string(),
        }
    }
}
