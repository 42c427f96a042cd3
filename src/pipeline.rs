//! The data pipeline's logging layout
//!
//! One `data_pipeline` logger for orchestration, one logger per storage
//! layer (bronze, silver, gold), and a shared error stream. The document is
//! shipped as `config/logging.yaml` and embedded here so it can be loaded
//! without touching the filesystem.

use crate::config::LoggingConfig;
use crate::core::{Logger, Result};
use crate::setup;
use std::sync::Arc;

/// The pipeline's configuration document
pub const PIPELINE_CONFIG_YAML: &str = include_str!("../config/logging.yaml");

pub const DATA_PIPELINE_LOGGER: &str = "data_pipeline";
pub const PIPELINE_LOG_FILE: &str = "logs/finance-plan-pipeline.log";
pub const ERROR_LOG_FILE: &str = "logs/errors.log";

/// Storage layer of the pipeline, each with its own logger and file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Bronze,
    Silver,
    Gold,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Bronze, Layer::Silver, Layer::Gold];

    pub fn logger_name(&self) -> &'static str {
        match self {
            Layer::Bronze => "data_pipeline_bronze",
            Layer::Silver => "data_pipeline_silver",
            Layer::Gold => "data_pipeline_gold",
        }
    }

    pub fn log_file(&self) -> &'static str {
        match self {
            Layer::Bronze => "logs/bronze_layer.log",
            Layer::Silver => "logs/silver_layer.log",
            Layer::Gold => "logs/gold_layer.log",
        }
    }
}

/// Parse the embedded pipeline document
pub fn pipeline_config() -> Result<LoggingConfig> {
    LoggingConfig::from_yaml_str(PIPELINE_CONFIG_YAML)
}

pub fn data_pipeline_logger() -> Result<Arc<Logger>> {
    setup::get_logger(DATA_PIPELINE_LOGGER)
}

pub fn layer_logger(layer: Layer) -> Result<Arc<Logger>> {
    setup::get_logger(layer.logger_name())
}

pub fn bronze_logger() -> Result<Arc<Logger>> {
    layer_logger(Layer::Bronze)
}

pub fn silver_logger() -> Result<Arc<Logger>> {
    layer_logger(Layer::Silver)
}

pub fn gold_logger() -> Result<Arc<Logger>> {
    layer_logger(Layer::Gold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandlerClass;
    use std::collections::HashSet;
    use std::path::PathBuf;

    #[test]
    fn test_embedded_document_is_valid() {
        let config = pipeline_config().expect("pipeline document parses");
        config.validate().expect("pipeline document validates");
        assert!(!config.disable_existing_loggers);
    }

    #[test]
    fn test_every_referenced_handler_is_declared() {
        let config = pipeline_config().unwrap();
        for (logger, handler) in config.referenced_handlers() {
            assert!(
                config.handlers.contains_key(handler),
                "logger '{}' references undeclared handler '{}'",
                logger,
                handler
            );
        }
    }

    #[test]
    fn test_every_formatter_reference_resolves() {
        let config = pipeline_config().unwrap();
        for (name, handler) in &config.handlers {
            let formatter = handler.formatter.as_ref().expect("formatter set");
            assert!(
                config.formatters.contains_key(formatter),
                "handler '{}' uses undeclared formatter '{}'",
                name,
                formatter
            );
        }
    }

    #[test]
    fn test_file_bindings_are_unique() {
        let config = pipeline_config().unwrap();
        let files: Vec<PathBuf> = config
            .handlers
            .values()
            .filter(|handler| handler.class.parse::<HandlerClass>() == Ok(HandlerClass::File))
            .filter_map(|handler| handler.filename.clone())
            .collect();

        let unique: HashSet<&PathBuf> = files.iter().collect();
        assert_eq!(files.len(), 5);
        assert_eq!(unique.len(), 5);

        let expected: HashSet<PathBuf> = [PIPELINE_LOG_FILE, ERROR_LOG_FILE]
            .into_iter()
            .chain(Layer::ALL.iter().map(|layer| layer.log_file()))
            .map(PathBuf::from)
            .collect();
        assert_eq!(files.into_iter().collect::<HashSet<_>>(), expected);
    }

    #[test]
    fn test_named_loggers_do_not_propagate() {
        let config = pipeline_config().unwrap();
        let names: Vec<&str> = std::iter::once(DATA_PIPELINE_LOGGER)
            .chain(Layer::ALL.iter().map(|layer| layer.logger_name()))
            .collect();

        assert_eq!(config.loggers.len(), names.len());
        for name in names {
            assert!(!config.loggers[name].propagate, "{} propagates", name);
        }
    }
}
