//! Configuration document model
//!
//! Mirrors the four sections of a logging document (`formatters`,
//! `handlers`, `loggers`, `root`) plus the `version` header. Unknown keys are
//! rejected. Values that need cross-checking (handler classes, levels,
//! streams, file modes) are kept as written here and resolved by the loader,
//! so errors can name the component they belong to.

use crate::core::{LogLevel, LoggerError, Result};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The only supported document version
pub const SUPPORTED_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub version: u32,
    #[serde(default = "default_true", deserialize_with = "deserialize_flag")]
    pub disable_existing_loggers: bool,
    #[serde(default)]
    pub formatters: BTreeMap<String, FormatterConfig>,
    #[serde(default)]
    pub handlers: BTreeMap<String, HandlerConfig>,
    #[serde(default)]
    pub loggers: BTreeMap<String, LoggerConfig>,
    #[serde(default)]
    pub root: Option<RootConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterConfig {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub datefmt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    pub class: String,
    #[serde(default)]
    pub level: Option<LevelValue>,
    #[serde(default)]
    pub formatter: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub filename: Option<PathBuf>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub delay: bool,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    #[serde(default)]
    pub level: Option<LevelValue>,
    #[serde(default)]
    pub handlers: Vec<String>,
    #[serde(default = "default_true", deserialize_with = "deserialize_flag")]
    pub propagate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootConfig {
    #[serde(default)]
    pub level: Option<LevelValue>,
    #[serde(default)]
    pub handlers: Vec<String>,
}

/// A level as written in a document: a name (`INFO`) or a number (`20`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LevelValue {
    Number(u32),
    Name(String),
}

impl LevelValue {
    /// Resolve to a level; `NOTSET` (or `0`) resolves to `None`
    pub fn resolve(&self, component: &str) -> Result<Option<LogLevel>> {
        match self {
            LevelValue::Number(0) => Ok(None),
            LevelValue::Number(n) => LogLevel::from_number(*n)
                .map(Some)
                .ok_or_else(|| LoggerError::invalid_level(component, n.to_string())),
            LevelValue::Name(name) if name.trim().eq_ignore_ascii_case("NOTSET") => Ok(None),
            LevelValue::Name(name) => name
                .parse::<LogLevel>()
                .map(Some)
                .map_err(|_| LoggerError::invalid_level(component, name.clone())),
        }
    }
}

impl From<LogLevel> for LevelValue {
    fn from(level: LogLevel) -> Self {
        LevelValue::Name(level.to_str().to_string())
    }
}

/// Sink implementation selected by a handler's `class`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerClass {
    Stream,
    File,
}

impl FromStr for HandlerClass {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "logging.StreamHandler" | "StreamHandler" | "stream" => Ok(HandlerClass::Stream),
            "logging.FileHandler" | "FileHandler" | "file" => Ok(HandlerClass::File),
            other => Err(format!("Unknown handler class: '{}'", other)),
        }
    }
}

impl LoggingConfig {
    /// Parse a YAML document
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeline_logger::config::LoggingConfig;
    ///
    /// let config = LoggingConfig::from_yaml_str(
    ///     r#"
    /// version: 1
    /// handlers:
    ///   console:
    ///     class: logging.StreamHandler
    ///     stream: ext://sys.stdout
    /// loggers:
    ///   data_pipeline:
    ///     level: INFO
    ///     handlers: [console]
    ///     propagate: no
    /// "#,
    /// )
    /// .unwrap();
    ///
    /// assert!(!config.loggers["data_pipeline"].propagate);
    /// ```
    pub fn from_yaml_str(document: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(document)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Read and parse a document; `.json` files are JSON, anything else YAML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading logging configuration", path.display().to_string(), e)
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&document)
        } else {
            Self::from_yaml_str(&document)
        }
    }

    /// Names of all handlers referenced by loggers and root, in document order
    pub fn referenced_handlers(&self) -> Vec<(&str, &str)> {
        let mut refs: Vec<(&str, &str)> = Vec::new();
        for (logger, config) in &self.loggers {
            for handler in &config.handlers {
                refs.push((logger.as_str(), handler.as_str()));
            }
        }
        if let Some(root) = &self.root {
            for handler in &root.handlers {
                refs.push(("root", handler.as_str()));
            }
        }
        refs
    }
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Text(String),
}

/// Parse a YAML 1.1 style boolean (`yes`, `no`, `on`, `off`, `true`, `false`)
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "on" | "true" | "1" => Some(true),
        "no" | "n" | "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(value) => Ok(value),
        RawFlag::Text(text) => parse_flag(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid boolean '{}'", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document() {
        let config = LoggingConfig::from_yaml_str("version: 1\n").unwrap();
        assert_eq!(config.version, 1);
        assert!(config.disable_existing_loggers);
        assert!(config.formatters.is_empty());
        assert!(config.root.is_none());
    }

    #[test]
    fn test_yaml_11_booleans() {
        let config = LoggingConfig::from_yaml_str(
            r#"
version: 1
disable_existing_loggers: False
loggers:
  a: { propagate: no }
  b: { propagate: yes }
  c: { propagate: false }
  d: {}
"#,
        )
        .unwrap();

        assert!(!config.disable_existing_loggers);
        assert!(!config.loggers["a"].propagate);
        assert!(config.loggers["b"].propagate);
        assert!(!config.loggers["c"].propagate);
        assert!(config.loggers["d"].propagate);
    }

    #[test]
    fn test_invalid_boolean_rejected() {
        let err = LoggingConfig::from_yaml_str("version: 1\nloggers:\n  a: { propagate: maybe }\n")
            .unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = LoggingConfig::from_yaml_str(
            "version: 1\nhandlers:\n  console:\n    class: stream\n    colour: red\n",
        )
        .unwrap_err();
        assert!(err.is_schema_error());

        let err = LoggingConfig::from_yaml_str("version: 1\nfilters: {}\n").unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_level_values() {
        assert_eq!(
            LevelValue::Name("info".into()).resolve("x").unwrap(),
            Some(LogLevel::Info)
        );
        assert_eq!(
            LevelValue::Number(40).resolve("x").unwrap(),
            Some(LogLevel::Error)
        );
        assert_eq!(LevelValue::Name("NOTSET".into()).resolve("x").unwrap(), None);
        assert_eq!(LevelValue::Number(0).resolve("x").unwrap(), None);
        assert!(LevelValue::Number(35).resolve("x").is_err());
        assert!(LevelValue::Name("LOUD".into()).resolve("x").is_err());
    }

    #[test]
    fn test_numeric_level_in_yaml() {
        let config =
            LoggingConfig::from_yaml_str("version: 1\nroot:\n  level: 40\n  handlers: []\n").unwrap();
        let root = config.root.unwrap();
        assert_eq!(root.level, Some(LevelValue::Number(40)));
    }

    #[test]
    fn test_handler_class_names() {
        assert_eq!("logging.StreamHandler".parse::<HandlerClass>(), Ok(HandlerClass::Stream));
        assert_eq!("FileHandler".parse::<HandlerClass>(), Ok(HandlerClass::File));
        assert!("logging.handlers.RotatingFileHandler".parse::<HandlerClass>().is_err());
    }

    #[test]
    fn test_json_document() {
        let config = LoggingConfig::from_json_str(
            r#"{
                "version": 1,
                "handlers": {"console": {"class": "stream", "level": "INFO"}},
                "root": {"level": "ERROR", "handlers": ["console"]}
            }"#,
        )
        .unwrap();
        assert_eq!(config.handlers["console"].class, "stream");
        assert_eq!(config.referenced_handlers(), vec![("root", "console")]);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("On"), Some(true));
        assert_eq!(parse_flag("NO"), Some(false));
        assert_eq!(parse_flag("perhaps"), None);
    }
}
