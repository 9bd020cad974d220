//! Feature Engineering Error Types

use feature_frame::FrameError;
use thiserror::Error;

/// Errors during feature derivation
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Frame could not accept a derived column
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Configuration cannot produce a valid feature
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}
