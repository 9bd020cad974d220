//! Pipeline errors

use feature_engine::FeatureError;
use feature_frame::FrameError;
use feature_scaler::ScalingError;
use std::path::PathBuf;
use storage::StorageError;
use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No CSV files found in {}", display_dirs(.searched))]
    InputNotFound { searched: Vec<PathBuf> },
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("Feature engineering error: {0}")]
    Feature(#[from] FeatureError),
    #[error("Scaling error: {0}")]
    Scaling(#[from] ScalingError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    let dirs: Vec<String> = dirs.iter().map(|d| d.display().to_string()).collect();
    dirs.join(" or ")
}
