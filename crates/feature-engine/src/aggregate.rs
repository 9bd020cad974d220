//! Aggregated Features

use crate::arith::divide_offset;
use crate::binning::EqualWidthBins;
use crate::columns::*;
use crate::engineer::{cells, FeatureEngineer};
use crate::error::FeatureError;
use feature_frame::{Frame, Value};
use tracing::{debug, info, warn};

/// Service flag columns recognized by exact name
pub const SERVICE_COLUMNS: [&str; 9] = [
    "PhoneService",
    "MultipleLines",
    "InternetService",
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
];

/// Columns this engine derives itself; never counted as services
const DERIVED_SERVICE_COLUMNS: [&str; 3] =
    [TOTAL_SERVICES, SERVICE_DENSITY, SERVICES_CHARGES_INTERACTION];

/// Ordinal stability code for a tenure given inclusive upper bounds
pub fn tenure_stability(tenure: f64, bounds: &[f64; 3]) -> i64 {
    bounds
        .iter()
        .position(|&bound| tenure <= bound)
        .map_or(3, |idx| idx as i64)
}

impl FeatureEngineer {
    /// Columns counted by `total_services`, in frame order
    pub fn detect_service_columns<'a>(&self, frame: &'a Frame) -> Vec<&'a str> {
        frame
            .column_names()
            .into_iter()
            .filter(|name| !DERIVED_SERVICE_COLUMNS.contains(name))
            .filter(|name| {
                name.to_lowercase().contains("service")
                    || self.config().service_columns.iter().any(|c| c == name)
            })
            .collect()
    }

    /// Add service totals, value segments, tenure stability and payment risk
    pub fn create_aggregated_features(&self, mut frame: Frame) -> Result<Frame, FeatureError> {
        let config = self.config();

        let services = self.detect_service_columns(&frame);
        if services.is_empty() {
            debug!("No service columns present, skipping {}", TOTAL_SERVICES);
        } else {
            debug!("Service columns: {:?}", services);
            let totals: Vec<Value> = (0..frame.row_count())
                .map(|row| {
                    let count = services
                        .iter()
                        .filter_map(|name| frame.column(name))
                        .filter(|column| column.values()[row].is_truthy())
                        .count();
                    Value::Int(count as i64)
                })
                .collect();
            frame.insert_column(TOTAL_SERVICES, totals)?;

            if let Some(tenure) = cells(&frame, TENURE) {
                let density = frame
                    .column(TOTAL_SERVICES)
                    .map(|total| {
                        total
                            .values()
                            .iter()
                            .zip(&tenure)
                            .map(|(t, tenure)| divide_offset(t, tenure))
                            .collect()
                    })
                    .unwrap_or_default();
                frame.insert_column(SERVICE_DENSITY, density)?;
            }
        }

        if let Some(total_charges) = frame.column(TOTAL_CHARGES) {
            let numbers = total_charges.numbers();
            match EqualWidthBins::fit(&numbers, config.value_segment_bins) {
                Some(bins) => {
                    debug!("{} bin edges: {:?}", CUSTOMER_VALUE_SEGMENT, bins.edges());
                    let segments = numbers
                        .iter()
                        .map(|v| {
                            v.and_then(|v| bins.assign(v))
                                .map_or(Value::Null, |code| Value::Int(code as i64))
                        })
                        .collect();
                    frame.insert_column(CUSTOMER_VALUE_SEGMENT, segments)?;
                }
                None => warn!(
                    "{} has no numeric values, skipping {}",
                    TOTAL_CHARGES, CUSTOMER_VALUE_SEGMENT
                ),
            }
        }

        if let Some(tenure) = cells(&frame, TENURE) {
            let stability = tenure
                .iter()
                .map(|t| {
                    t.as_f64().map_or(Value::Null, |t| {
                        Value::Int(tenure_stability(t, &config.tenure_stability_bounds))
                    })
                })
                .collect();
            frame.insert_column(TENURE_STABILITY, stability)?;
        }

        if let Some(payment) = cells(&frame, PAYMENT_METHOD) {
            let code = config.high_risk_payment_code as f64;
            let risk = payment
                .iter()
                .map(|p| Value::Int(i64::from(p.as_f64() == Some(code))))
                .collect();
            frame.insert_column(HIGH_RISK_PAYMENT, risk)?;
        }

        info!("Aggregated features created");
        Ok(frame)
    }
}
