//! Logger registry
//!
//! Owns the root logger and every named logger. Names form a tree by
//! dot-separated prefix: `data_pipeline_bronze.fred` is a child of
//! `data_pipeline_bronze` when that logger exists, otherwise of the root.

use super::{
    error::Result,
    handler::SharedHandler,
    log_level::LogLevel,
    logger::Logger,
    metrics::LoggerMetrics,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub const ROOT_LOGGER_NAME: &str = "root";

pub struct Registry {
    root: Arc<Logger>,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
    metrics: Arc<LoggerMetrics>,
}

impl Registry {
    /// Create a registry whose root logger has the given level and no handlers
    #[must_use]
    pub fn new(root_level: LogLevel) -> Self {
        let metrics = Arc::new(LoggerMetrics::new());
        let root = Logger::with_metrics(ROOT_LOGGER_NAME, Arc::clone(&metrics));
        root.set_level(Some(root_level));

        Self {
            root: Arc::new(root),
            loggers: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    pub fn root(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Return the logger with this name, creating it if needed.
    ///
    /// New loggers have no level, no handlers and propagation enabled. An
    /// empty name or `"root"` returns the root logger.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        if name.is_empty() || name == ROOT_LOGGER_NAME {
            return self.root();
        }

        if let Some(logger) = self.loggers.read().get(name) {
            return Arc::clone(logger);
        }

        let mut loggers = self.loggers.write();
        if let Some(logger) = loggers.get(name) {
            return Arc::clone(logger);
        }

        let logger = Arc::new(Logger::with_metrics(name, Arc::clone(&self.metrics)));

        let parent = ancestors(name)
            .find_map(|ancestor| loggers.get(ancestor).cloned())
            .unwrap_or_else(|| self.root());
        logger.set_parent(Some(parent));

        // Existing descendants that were attached above this logger move under it
        let prefix = format!("{}.", name);
        for (child_name, child) in loggers.iter() {
            if !child_name.starts_with(&prefix) {
                continue;
            }
            let attached_below = child
                .parent()
                .map(|p| p.name() == name || p.name().starts_with(&prefix))
                .unwrap_or(false);
            if !attached_below {
                child.set_parent(Some(Arc::clone(&logger)));
            }
        }

        loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    /// Whether a named logger has been created
    pub fn contains(&self, name: &str) -> bool {
        self.loggers.read().contains_key(name)
    }

    /// Names of all non-root loggers, sorted
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Every distinct handler bound to any logger, root first
    pub fn handlers(&self) -> Vec<SharedHandler> {
        let mut unique: Vec<SharedHandler> = Vec::new();
        let loggers = self.loggers.read();
        let all = std::iter::once(&self.root).chain(loggers.values());

        for logger in all {
            for handler in logger.handlers() {
                if !unique.iter().any(|seen| Arc::ptr_eq(seen, &handler)) {
                    unique.push(handler);
                }
            }
        }
        unique
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        for handler in self.handlers() {
            handler.flush()?;
        }
        Ok(())
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("root", &self.root)
            .field("loggers", &self.logger_names())
            .finish()
    }
}

/// Dotted prefixes of `name`, nearest first: `a.b.c` yields `a.b`, then `a`
fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    name.rmatch_indices('.').map(move |(idx, _)| &name[..idx])
}
