//! Turns a [`LoggingConfig`] into a live [`Registry`]
//!
//! Loading happens in two steps. Planning validates the whole document
//! (version, classes, levels, references, formatter templates) without
//! touching the filesystem. Instantiation then opens files and wires
//! handlers to loggers. Any failure aborts the load; no partial registry is
//! returned.

use super::schema::{HandlerClass, HandlerConfig, LevelValue, LoggingConfig, SUPPORTED_VERSION};
use crate::core::{
    Formatter, Handler, HandlerSlot, LogLevel, LoggerError, Registry, Result, SharedHandler,
    DEFAULT_ROOT_LEVEL,
};
use crate::handlers::{FileHandler, FileMode, StreamHandler, StreamTarget};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where relative file paths resolve and whether missing directories are created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub base_dir: PathBuf,
    pub create_dirs: bool,
}

impl LoadOptions {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            create_dirs: false,
        }
    }

    #[must_use]
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

#[derive(Debug, Clone)]
enum SinkPlan {
    Stream(StreamTarget),
    File {
        path: PathBuf,
        mode: FileMode,
        delay: bool,
    },
}

#[derive(Debug, Clone)]
struct HandlerPlan {
    name: String,
    level: LogLevel,
    formatter: Arc<Formatter>,
    sink: SinkPlan,
}

#[derive(Debug, Clone)]
struct LoggerPlan {
    name: String,
    level: Option<LogLevel>,
    handlers: Vec<String>,
    propagate: bool,
}

#[derive(Debug, Clone)]
struct Plan {
    handlers: Vec<HandlerPlan>,
    loggers: Vec<LoggerPlan>,
    root_level: LogLevel,
    root_handlers: Vec<String>,
}

fn resolve_level(value: Option<&LevelValue>, component: &str) -> Result<Option<LogLevel>> {
    match value {
        Some(value) => value.resolve(component),
        None => Ok(None),
    }
}

fn plan_handler(
    name: &str,
    config: &HandlerConfig,
    formatters: &BTreeMap<String, Arc<Formatter>>,
) -> Result<HandlerPlan> {
    let class = config
        .class
        .parse::<HandlerClass>()
        .map_err(|_| LoggerError::unknown_handler_class(name, config.class.clone()))?;

    let component = format!("handler '{}'", name);
    let level = resolve_level(config.level.as_ref(), &component)?.unwrap_or(LogLevel::Debug);

    let formatter = match &config.formatter {
        Some(formatter_name) => formatters
            .get(formatter_name)
            .cloned()
            .ok_or_else(|| LoggerError::unknown_formatter(name, formatter_name.clone()))?,
        None => Arc::new(Formatter::default()),
    };

    let sink = match class {
        HandlerClass::Stream => {
            if config.filename.is_some() || config.mode.is_some() || config.encoding.is_some() {
                return Err(LoggerError::schema(format!(
                    "{} is a stream handler and takes no filename, mode or encoding",
                    component
                )));
            }
            let target = match &config.stream {
                Some(stream) => stream
                    .parse::<StreamTarget>()
                    .map_err(|e| LoggerError::schema(format!("{}: {}", component, e)))?,
                None => StreamTarget::default(),
            };
            SinkPlan::Stream(target)
        }
        HandlerClass::File => {
            if config.stream.is_some() {
                return Err(LoggerError::schema(format!(
                    "{} is a file handler and takes no stream",
                    component
                )));
            }
            let path = config.filename.clone().ok_or_else(|| {
                LoggerError::schema(format!("{} requires a filename", component))
            })?;
            let mode = match &config.mode {
                Some(mode) => mode
                    .parse::<FileMode>()
                    .map_err(|e| LoggerError::schema(format!("{}: {}", component, e)))?,
                None => FileMode::default(),
            };
            if let Some(encoding) = &config.encoding {
                let normalized = encoding.trim().to_lowercase().replace(['-', '_'], "");
                if normalized != "utf8" {
                    return Err(LoggerError::schema(format!(
                        "{}: unsupported encoding '{}'",
                        component, encoding
                    )));
                }
            }
            SinkPlan::File {
                path,
                mode,
                delay: config.delay,
            }
        }
    };

    Ok(HandlerPlan {
        name: name.to_string(),
        level,
        formatter,
        sink,
    })
}

fn check_references(owner: &str, handlers: &[String], known: &[HandlerPlan]) -> Result<()> {
    for handler in handlers {
        if !known.iter().any(|plan| &plan.name == handler) {
            return Err(LoggerError::unknown_handler(owner, handler.clone()));
        }
    }
    Ok(())
}

impl LoggingConfig {
    fn plan(&self) -> Result<Plan> {
        if self.version != SUPPORTED_VERSION {
            return Err(LoggerError::schema(format!(
                "unsupported version {} (expected {})",
                self.version, SUPPORTED_VERSION
            )));
        }

        let mut formatters = BTreeMap::new();
        for (name, config) in &self.formatters {
            let formatter =
                Formatter::from_config(config.format.as_deref(), config.datefmt.as_deref())?;
            formatters.insert(name.clone(), formatter.shared());
        }

        let handlers = self
            .handlers
            .iter()
            .map(|(name, config)| plan_handler(name, config, &formatters))
            .collect::<Result<Vec<_>>>()?;

        let mut loggers = Vec::with_capacity(self.loggers.len());
        for (name, config) in &self.loggers {
            let level = resolve_level(config.level.as_ref(), &format!("logger '{}'", name))?;
            check_references(name, &config.handlers, &handlers)?;
            loggers.push(LoggerPlan {
                name: name.clone(),
                level,
                handlers: config.handlers.clone(),
                propagate: config.propagate,
            });
        }

        let (root_level, root_handlers) = match &self.root {
            Some(root) => {
                // NOTSET on the root lets every record through
                let level = match &root.level {
                    Some(value) => value.resolve("root logger")?.unwrap_or(LogLevel::Debug),
                    None => DEFAULT_ROOT_LEVEL,
                };
                check_references("root", &root.handlers, &handlers)?;
                (level, root.handlers.clone())
            }
            None => (DEFAULT_ROOT_LEVEL, Vec::new()),
        };

        Ok(Plan {
            handlers,
            loggers,
            root_level,
            root_handlers,
        })
    }

    /// Check the document without opening any file
    pub fn validate(&self) -> Result<()> {
        self.plan().map(|_| ())
    }

    /// Validate, open every sink and wire loggers into a new registry
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeline_logger::config::{LoadOptions, LoggingConfig};
    ///
    /// let config = LoggingConfig::from_yaml_str(
    ///     "version: 1\nhandlers:\n  console: { class: stream, stream: ext://sys.stdout }\nroot: { level: ERROR, handlers: [console] }\n",
    /// )
    /// .unwrap();
    /// let registry = config.build(&LoadOptions::default()).unwrap();
    /// assert_eq!(registry.root().handler_names(), vec!["console"]);
    /// ```
    pub fn build(&self, options: &LoadOptions) -> Result<Registry> {
        let plan = self.plan()?;

        let mut built: BTreeMap<String, SharedHandler> = BTreeMap::new();
        for handler in &plan.handlers {
            let sink: Box<dyn Handler> = match &handler.sink {
                SinkPlan::Stream(target) => Box::new(StreamHandler::new(*target)),
                SinkPlan::File { path, mode, delay } => {
                    let path = options.resolve(path);
                    if options.create_dirs {
                        if let Some(parent) = path.parent() {
                            std::fs::create_dir_all(parent).map_err(|e| {
                                LoggerError::io_operation(
                                    "creating log directory",
                                    parent.display().to_string(),
                                    e,
                                )
                            })?;
                        }
                    }
                    if *delay {
                        Box::new(FileHandler::delayed(path, *mode))
                    } else {
                        Box::new(FileHandler::with_mode(path, *mode)?)
                    }
                }
            };

            let slot = HandlerSlot::new(
                handler.name.clone(),
                handler.level,
                Arc::clone(&handler.formatter),
                sink,
            );
            built.insert(handler.name.clone(), slot.shared());
        }

        let registry = Registry::new(plan.root_level);
        let root = registry.root();
        for name in &plan.root_handlers {
            if let Some(handler) = built.get(name) {
                root.add_handler(Arc::clone(handler));
            }
        }

        for logger_plan in &plan.loggers {
            let logger = registry.get_logger(&logger_plan.name);
            logger.set_level(logger_plan.level);
            logger.set_propagate(logger_plan.propagate);
            for name in &logger_plan.handlers {
                if let Some(handler) = built.get(name) {
                    logger.add_handler(Arc::clone(handler));
                }
            }
        }

        Ok(registry)
    }
}
