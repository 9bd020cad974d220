//! Column Scalers

use feature_engine::ColumnStatistics;
use feature_frame::Value;
use serde::{Deserialize, Serialize};

/// Scaling method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingMethod {
    /// Zero mean, unit variance
    Standard,
    /// Min-max scaling to [0, 1]
    MinMax,
}

/// Fitted scaler parameters for one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScalerParams {
    Standard {
        /// Mean of the fitted values
        mean: f64,
        /// Divisor: population std dev, or 1.0 for a constant column
        scale: f64,
    },
    MinMax {
        /// Minimum of the fitted values
        min: f64,
        /// Divisor: max - min, or 1.0 for a constant column
        range: f64,
    },
}

impl ScalerParams {
    /// Fit parameters for `method`; `None` when no value is present
    pub fn fit(method: ScalingMethod, values: &[Option<f64>]) -> Option<Self> {
        let stats = ColumnStatistics::compute(values);
        if stats.is_empty() {
            return None;
        }
        Some(match method {
            ScalingMethod::Standard => ScalerParams::Standard {
                mean: stats.mean,
                scale: non_zero(stats.std_dev),
            },
            ScalingMethod::MinMax => ScalerParams::MinMax {
                min: stats.min,
                range: non_zero(stats.range()),
            },
        })
    }

    pub fn method(&self) -> ScalingMethod {
        match self {
            ScalerParams::Standard { .. } => ScalingMethod::Standard,
            ScalerParams::MinMax { .. } => ScalingMethod::MinMax,
        }
    }

    /// Scale one value
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            ScalerParams::Standard { mean, scale } => (value - mean) / scale,
            ScalerParams::MinMax { min, range } => (value - min) / range,
        }
    }

    /// Scale one cell; missing and non-numeric cells become `Null`
    pub fn apply_cell(&self, value: &Value) -> Value {
        value.as_f64().map_or(Value::Null, |v| Value::float(self.apply(v)))
    }
}

fn non_zero(scale: f64) -> f64 {
    if scale == 0.0 || !scale.is_finite() {
        1.0
    } else {
        scale
    }
}

/// Parameters fitted for a named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedColumn {
    pub name: String,
    pub params: ScalerParams,
}
