//! Base Derived Features
//!
//! Label encoding, tenure groups and charge ratios. Each is only derived when
//! the target column is not already in the frame.

use crate::arith::{divide, divide_offset};
use crate::columns::*;
use crate::engineer::{cells, zip_with, FeatureEngineer};
use crate::error::FeatureError;
use feature_frame::{Frame, Value};
use tracing::debug;

/// Right-closed group code for a tenure; -1 when outside every group
pub fn tenure_group(tenure: f64, edges: &[f64]) -> i64 {
    edges
        .windows(2)
        .position(|w| tenure > w[0] && tenure <= w[1])
        .map_or(-1, |idx| idx as i64)
}

fn encode_label(value: &Value) -> Value {
    match value {
        Value::Text(s) if s.trim().eq_ignore_ascii_case("yes") => Value::Int(1),
        Value::Text(s) if s.trim().eq_ignore_ascii_case("no") => Value::Int(0),
        Value::Text(_) => Value::Null,
        Value::Bool(b) => Value::Int(i64::from(*b)),
        other => other.clone(),
    }
}

impl FeatureEngineer {
    /// Encode the churn label and derive tenure groups and charge ratios
    pub fn create_base_features(&self, mut frame: Frame) -> Result<Frame, FeatureError> {
        if let Some(label) = frame.column(CHURN) {
            if label.values().iter().any(|v| matches!(v, Value::Text(_) | Value::Bool(_))) {
                let encoded = label.values().iter().map(encode_label).collect();
                frame.insert_column(CHURN, encoded)?;
                debug!("Encoded {} label to 0/1", CHURN);
            }
        }

        if !frame.has_column(TENURE_GROUP) {
            if let Some(tenure) = cells(&frame, TENURE) {
                let edges = &self.config().tenure_group_edges;
                let groups = tenure
                    .iter()
                    .map(|t| t.as_f64().map_or(Value::Null, |t| Value::Int(tenure_group(t, edges))))
                    .collect();
                frame.insert_column(TENURE_GROUP, groups)?;
            }
        }

        let ratios: [(&str, &str, &str, fn(&Value, &Value) -> Value); 3] = [
            (CHARGES_PER_TENURE, MONTHLY_CHARGES, TENURE, divide_offset),
            (TOTAL_TO_MONTHLY_RATIO, TOTAL_CHARGES, MONTHLY_CHARGES, divide),
            (AVG_MONTHLY_CHARGES, TOTAL_CHARGES, TENURE, divide_offset),
        ];
        for (target, numerator, denominator, op) in ratios {
            if frame.has_column(target) {
                continue;
            }
            if let Some(values) = zip_with(&frame, numerator, denominator, op) {
                frame.insert_column(target, values)?;
            }
        }

        debug!("Base features ready: {} columns", frame.column_count());
        Ok(frame)
    }
}
