//! Storage Layer
//!
//! SQLite persistence for engineered customer features, the feature metadata
//! catalog and training set lineage. A repository owns one connection and is
//! the only writer of its database; concurrent writers are not supported.

mod quality;
mod records;
mod repository;
mod schema;
mod sql;

pub use quality::data_quality_score;
pub use records::{
    target_distribution, FeatureMetadataRecord, FeatureType, TrainingSetHandle, TrainingSetRecord,
};
pub use repository::{FeatureRepository, StorageConfig};
pub use schema::{FEATURE_TABLE, METADATA_TABLE, TRAINING_SETS_TABLE};

use feature_frame::FrameError;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("Unknown feature column: {0}")]
    UnknownColumn(String),
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}
