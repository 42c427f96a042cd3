//! Pipeline logging example
//!
//! Configures logging from `config/logging.yaml` (or the document named by
//! `LOGGING_CONFIG_PATH`) and logs from the orchestration and layer loggers.
//! Output lands on stdout and under `logs/`.
//!
//! Run with: cargo run --example pipeline_logging

use pipeline_logger::pipeline::{self, Layer};
use pipeline_logger::prelude::*;
use pipeline_logger::{info, setup};
use std::path::Path;

fn main() -> Result<()> {
    println!("=== Pipeline Logger - Pipeline Logging Example ===\n");

    let explicit = std::env::var_os(setup::CONFIG_PATH_ENV).is_none();
    let registry = if explicit {
        setup_logging(Some(Path::new("config/logging.yaml")))?
    } else {
        setup_logging(None)?
    };

    println!("1. Orchestration logger (console, pipeline file, error file):");
    let orchestrator = pipeline::data_pipeline_logger()?;
    orchestrator.info("Pipeline started");
    orchestrator.error("Pipeline stage failed; this line also reaches logs/errors.log");

    println!("\n2. Layer loggers (console and their own file only):");
    for layer in Layer::ALL {
        let logger = pipeline::layer_logger(layer)?;
        info!(logger, "Processing layer, writing to {}", layer.log_file());
        logger.debug("Hidden: below the layer logger's INFO level");
    }

    println!("\n3. A logger nobody configured falls through to root (ERROR):");
    let adhoc = setup::get_logger("adhoc")?;
    adhoc.warning("Hidden: below root's level");
    adhoc.error("Only in logs/errors.log");

    registry.flush()?;
    println!("\nLoggers: {:?}", registry.logger_names());
    println!("Emitted: {}", registry.metrics().emitted_count());
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
