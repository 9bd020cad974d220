//! Scaling Error Types

use feature_frame::FrameError;
use thiserror::Error;

/// Errors during scaler fitting or application
#[derive(Debug, Error)]
pub enum ScalingError {
    /// Requested column holds non-numeric cells
    #[error("Column {0} is not numeric and cannot be scaled")]
    NonNumericColumn(String),

    /// Requested column not in the frame
    #[error("Missing column to scale: {0}")]
    MissingColumn(String),

    /// Frame rejected the scaled column
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
}
