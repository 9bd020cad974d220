//! Feature engine configuration

use crate::error::FeatureError;
use serde::{Deserialize, Serialize};

/// Feature engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Service flag columns counted by `total_services` (in addition to any
    /// column whose name contains "service")
    pub service_columns: Vec<String>,

    /// Upper bounds (inclusive) of tenure stability codes 0, 1 and 2
    pub tenure_stability_bounds: [f64; 3],

    /// Right-closed tenure group edges; codes 0..n-1, -1 outside
    pub tenure_group_edges: Vec<f64>,

    /// Number of equal-width bins for `customer_value_segment`
    pub value_segment_bins: usize,

    /// Encoded payment method treated as high risk
    pub high_risk_payment_code: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            service_columns: crate::SERVICE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            tenure_stability_bounds: [12.0, 36.0, 60.0],
            tenure_group_edges: vec![0.0, 12.0, 24.0, 48.0, 72.0],
            value_segment_bins: 4,
            high_risk_payment_code: 2,
        }
    }
}

impl EngineConfig {
    /// Check that bins and bounds describe usable, ascending cut points
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.value_segment_bins == 0 {
            return Err(FeatureError::InvalidConfig(
                "value_segment_bins must be at least 1".to_string(),
            ));
        }
        if self.tenure_group_edges.len() < 2 {
            return Err(FeatureError::InvalidConfig(
                "tenure_group_edges needs at least two edges".to_string(),
            ));
        }
        if !is_ascending(&self.tenure_group_edges) {
            return Err(FeatureError::InvalidConfig(
                "tenure_group_edges must be strictly ascending".to_string(),
            ));
        }
        if !is_ascending(&self.tenure_stability_bounds) {
            return Err(FeatureError::InvalidConfig(
                "tenure_stability_bounds must be strictly ascending".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_ascending(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}
