//! Frame Error Types

use thiserror::Error;

/// Errors raised while building, reshaping or (de)serializing a frame
#[derive(Debug, Error)]
pub enum FrameError {
    /// Column length differs from the frame's row count
    #[error("Column {column} has {actual} values, frame has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Column name already present
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Column name not present
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// CSV reader/writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
