//! Feature Engineering Engine
//!
//! Derives base ratios, aggregate service counts, ordinal segments and
//! interaction terms from cleaned customer records.

mod aggregate;
mod arith;
mod binning;
pub mod columns;
mod config;
mod derived;
mod engineer;
mod error;
mod interactions;
mod statistics;

pub use aggregate::{tenure_stability, SERVICE_COLUMNS};
pub use binning::EqualWidthBins;
pub use config::EngineConfig;
pub use derived::tenure_group;
pub use engineer::FeatureEngineer;
pub use error::FeatureError;
pub use statistics::ColumnStatistics;
