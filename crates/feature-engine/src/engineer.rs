//! Feature Engineer

use crate::config::EngineConfig;
use crate::error::FeatureError;
use feature_frame::{Frame, Value};
use tracing::info;

/// Derives engineered features from a cleaned customer frame.
///
/// Every derivation is conditional on its source columns: a missing source
/// silently skips that feature and leaves the rest of the frame untouched.
pub struct FeatureEngineer {
    config: EngineConfig,
}

impl FeatureEngineer {
    /// Create a new feature engineer
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run base, aggregated and interaction derivations in order
    pub fn engineer(&self, frame: Frame) -> Result<Frame, FeatureError> {
        let before = frame.column_count();
        let frame = self.create_base_features(frame)?;
        let frame = self.create_aggregated_features(frame)?;
        let frame = self.create_feature_interactions(frame)?;
        info!(
            "Engineered {} new features ({} rows)",
            frame.column_count() - before,
            frame.row_count()
        );
        Ok(frame)
    }
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Cloned cells of a column, if present
pub(crate) fn cells(frame: &Frame, name: &str) -> Option<Vec<Value>> {
    frame.column(name).map(|c| c.values().to_vec())
}

/// Apply `f` row-wise over two source columns
pub(crate) fn zip_with(
    frame: &Frame,
    left: &str,
    right: &str,
    f: impl Fn(&Value, &Value) -> Value,
) -> Option<Vec<Value>> {
    let left = frame.column(left)?;
    let right = frame.column(right)?;
    Some(
        left.values()
            .iter()
            .zip(right.values())
            .map(|(a, b)| f(a, b))
            .collect(),
    )
}
