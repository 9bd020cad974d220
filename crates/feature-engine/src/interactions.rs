//! Feature Interactions

use crate::arith::multiply;
use crate::columns::*;
use crate::engineer::{zip_with, FeatureEngineer};
use crate::error::FeatureError;
use feature_frame::Frame;
use tracing::info;

/// (target, left, right) products
const INTERACTIONS: [(&str, &str, &str); 4] = [
    (TENURE_MONTHLY_INTERACTION, TENURE, MONTHLY_CHARGES),
    (TENURE_TOTAL_INTERACTION, TENURE, TOTAL_CHARGES),
    (SERVICES_CHARGES_INTERACTION, TOTAL_SERVICES, MONTHLY_CHARGES),
    (CONTRACT_PAYMENT_INTERACTION, CONTRACT, PAYMENT_METHOD),
];

impl FeatureEngineer {
    /// Add pairwise products between key variables when both sides exist
    pub fn create_feature_interactions(&self, mut frame: Frame) -> Result<Frame, FeatureError> {
        let mut created = 0;
        for (target, left, right) in INTERACTIONS {
            if let Some(values) = zip_with(&frame, left, right, multiply) {
                frame.insert_column(target, values)?;
                created += 1;
            }
        }
        info!("Interaction features created ({})", created);
        Ok(frame)
    }
}
