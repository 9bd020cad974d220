//! Feature Scaling
//!
//! Fits standard (z-score) and min-max scalers to disjoint column groups and
//! applies them to a frame. Fitted parameters live in memory only.

mod error;
mod scaler;
mod stage;

pub use error::ScalingError;
pub use scaler::{FittedColumn, ScalerParams, ScalingMethod};
pub use stage::{FittedScalers, ScalerConfig, ScalerStage};
