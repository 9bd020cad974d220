//! Logging setup

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Stage name carried by the driver span and used for the log file
pub const STAGE_NAME: &str = "data_transformation_storage";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    /// Directory for the plain-text log file; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: Some(PathBuf::from("logs")),
        }
    }
}

/// Install the global subscriber: console output plus an optional log file.
///
/// The returned guard flushes the file writer when dropped and must be held
/// until the process exits.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, PipelineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| PipelineError::Logging(e.to_string()))?;

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, format!("{}.log", STAGE_NAME));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
        .map_err(|e| PipelineError::Logging(e.to_string()))?;

    Ok(guard)
}

/// Span wrapping every run of the stage
pub fn stage_span() -> Span {
    tracing::info_span!("stage", name = STAGE_NAME)
}
