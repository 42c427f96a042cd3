//! Process-wide logging setup
//!
//! Loads the configuration document named by an explicit path or by the
//! `LOGGING_CONFIG_PATH` environment variable, installs the resulting
//! registry once per process, and hands out named loggers from it.
//!
//! A missing or broken document never leaves the process without logging:
//! a basic configuration (root at WARNING, writing to stderr) is installed
//! instead and a warning explains why.

use crate::config::{LoadOptions, LoggingConfig};
use crate::core::{Formatter, HandlerSlot, LogLevel, Logger, LoggerError, Registry, Result, TimestampFormat};
use crate::handlers::StreamHandler;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Environment variable holding the configuration document path
pub const CONFIG_PATH_ENV: &str = "LOGGING_CONFIG_PATH";

/// Directory ensured under the base directory before a document is loaded
pub const LOGS_DIR: &str = "logs";

/// Line format of the basic (fallback) configuration
pub const BASIC_FORMAT: &str = "%(asctime)s - %(levelname)s - %(message)s";

static INSTALLED: OnceLock<Registry> = OnceLock::new();
static INSTALL_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// How a setup attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The document was loaded and its registry is in use
    Configured { path: PathBuf },
    /// The basic configuration is in use
    Fallback { reason: String },
}

impl SetupOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SetupOutcome::Fallback { .. })
    }
}

/// A registry together with how it was obtained
pub struct LoadedLogging {
    pub registry: Registry,
    pub outcome: SetupOutcome,
}

/// Root at `level`, one stderr handler using [`BASIC_FORMAT`]
pub fn basic_registry(level: LogLevel) -> Registry {
    let registry = Registry::new(level);
    let formatter = match Formatter::new(BASIC_FORMAT, TimestampFormat::Standard) {
        Ok(formatter) => formatter,
        Err(_) => Formatter::default(),
    };
    registry.root().add_handler(
        HandlerSlot::new(
            "basic",
            LogLevel::Debug,
            formatter.shared(),
            Box::new(StreamHandler::stderr()),
        )
        .shared(),
    );
    registry
}

/// Builder for a setup attempt
///
/// # Example
///
/// ```no_run
/// use pipeline_logger::setup::LoggingSetup;
///
/// let registry = LoggingSetup::from_env()
///     .config_path("config/logging.yaml")
///     .install()
///     .expect("logging configured");
/// registry.get_logger("data_pipeline").info("pipeline started");
/// ```
#[derive(Debug, Clone)]
pub struct LoggingSetup {
    config_path: Option<PathBuf>,
    base_dir: PathBuf,
    ensure_logs_dir: bool,
}

impl LoggingSetup {
    /// A setup with no document path, based in the current directory
    pub fn new() -> Self {
        Self {
            config_path: None,
            base_dir: PathBuf::from("."),
            ensure_logs_dir: true,
        }
    }

    /// A setup whose document path comes from `LOGGING_CONFIG_PATH`
    pub fn from_env() -> Self {
        let mut setup = Self::new();
        setup.config_path = std::env::var_os(CONFIG_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        setup
    }

    #[must_use]
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Directory relative log file paths resolve against
    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Create `logs/` and handler directories before opening files (default on)
    #[must_use]
    pub fn ensure_logs_dir(mut self, ensure: bool) -> Self {
        self.ensure_logs_dir = ensure;
        self
    }

    /// Build a registry without installing it
    ///
    /// Fails only when no document path is known; every other problem
    /// results in the basic configuration.
    pub fn load(&self) -> Result<LoadedLogging> {
        let path = self
            .config_path
            .clone()
            .ok_or(LoggerError::ConfigPathUnset)?;

        if !path.exists() {
            let reason = format!(
                "Logging configuration file not found at {}. Using basic configuration.",
                path.display()
            );
            return Ok(Self::fallback(reason));
        }

        match self.load_document(&path) {
            Ok(registry) => {
                registry.root().info(format!(
                    "Logging setup complete using configuration from: {}",
                    path.display()
                ));
                Ok(LoadedLogging {
                    registry,
                    outcome: SetupOutcome::Configured { path },
                })
            }
            Err(e) => {
                let reason = format!(
                    "Failed to load logging configuration from {}: {}. Using basic configuration.",
                    path.display(),
                    e
                );
                Ok(Self::fallback(reason))
            }
        }
    }

    fn load_document(&self, path: &Path) -> Result<Registry> {
        let config = LoggingConfig::from_path(path)?;
        config.validate()?;

        if self.ensure_logs_dir {
            let logs_dir = self.base_dir.join(LOGS_DIR);
            std::fs::create_dir_all(&logs_dir).map_err(|e| {
                LoggerError::io_operation("creating logs directory", logs_dir.display().to_string(), e)
            })?;
        }

        let options = LoadOptions::new(&self.base_dir).create_dirs(self.ensure_logs_dir);
        config.build(&options)
    }

    fn fallback(reason: String) -> LoadedLogging {
        let registry = basic_registry(LogLevel::Warning);
        registry.root().warning(reason.clone());
        LoadedLogging {
            registry,
            outcome: SetupOutcome::Fallback { reason },
        }
    }

    /// Load and install as the process-wide registry
    ///
    /// Only the first successful call has any effect; later calls return the
    /// registry already installed.
    pub fn install(self) -> Result<&'static Registry> {
        if let Some(registry) = INSTALLED.get() {
            return Ok(registry);
        }

        let _guard = INSTALL_LOCK.lock();
        if let Some(registry) = INSTALLED.get() {
            return Ok(registry);
        }

        let loaded = self.load()?;
        Ok(INSTALLED.get_or_init(|| loaded.registry))
    }
}

impl Default for LoggingSetup {
    fn default() -> Self {
        Self::new()
    }
}

/// Install logging from `config_path`, or from `LOGGING_CONFIG_PATH` when `None`
pub fn setup_logging(config_path: Option<&Path>) -> Result<&'static Registry> {
    let mut setup = LoggingSetup::from_env();
    if let Some(path) = config_path {
        setup = setup.config_path(path);
    }
    setup.install()
}

pub fn is_configured() -> bool {
    INSTALLED.get().is_some()
}

/// The process-wide registry, if setup has happened
pub fn installed() -> Option<&'static Registry> {
    INSTALLED.get()
}

/// Named logger from the process-wide registry, setting it up on first use
pub fn get_logger(name: &str) -> Result<Arc<Logger>> {
    let registry = match INSTALLED.get() {
        Some(registry) => registry,
        None => setup_logging(None)?,
    };
    Ok(registry.get_logger(name))
}

/// Flush every handler of the process-wide registry
pub fn shutdown() -> Result<()> {
    match INSTALLED.get() {
        Some(registry) => registry.flush(),
        None => Ok(()),
    }
}
