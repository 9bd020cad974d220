//! Churn Transformation Stage
//!
//! Discovers the newest cleaned customer CSV, engineers and scales features,
//! replaces the feature store table and snapshots a training set.

mod config;
mod discovery;
mod driver;
mod error;
mod logging;

pub use config::{PipelineConfig, DEFAULT_TRAINING_SET, ENV_PREFIX};
pub use discovery::{
    discover_latest, latest_training_set, list_candidates, rank_candidates, Candidate,
};
pub use driver::{RunSummary, TransformationPipeline, TransformationReport};
pub use error::PipelineError;
pub use logging::{init_logging, stage_span, LoggingConfig, STAGE_NAME};
