//! Scaler Stage

use crate::error::ScalingError;
use crate::scaler::{FittedColumn, ScalerParams, ScalingMethod};
use feature_engine::columns::{
    CHURN, CUSTOMER_VALUE_SEGMENT, ENCODED_SUFFIX, MONTHLY_CHARGES, TENURE, TENURE_GROUP,
    TOTAL_CHARGES,
};
use feature_frame::Frame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Column partitioning for the scaler stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalerConfig {
    /// Columns scaled to zero mean and unit variance
    pub standard_columns: Vec<String>,
    /// Label and ordinal columns left raw
    pub excluded_columns: Vec<String>,
    /// Name suffix of categorical columns left raw
    pub excluded_suffix: String,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            standard_columns: [TENURE, MONTHLY_CHARGES, TOTAL_CHARGES]
                .map(String::from)
                .to_vec(),
            excluded_columns: [CHURN, TENURE_GROUP, CUSTOMER_VALUE_SEGMENT]
                .map(String::from)
                .to_vec(),
            excluded_suffix: ENCODED_SUFFIX.to_string(),
        }
    }
}

/// Scaler parameters fitted on one batch.
///
/// Held in memory only; a later batch refits from scratch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FittedScalers {
    columns: Vec<FittedColumn>,
}

impl FittedScalers {
    pub fn columns(&self) -> &[FittedColumn] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&ScalerParams> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.params)
    }

    /// Names of the columns fitted with `method`
    pub fn columns_with(&self, method: ScalingMethod) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.params.method() == method)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Apply the fitted parameters to a frame holding the same columns
    pub fn transform(&self, mut frame: Frame) -> Result<Frame, ScalingError> {
        for fitted in &self.columns {
            let column = frame
                .column(&fitted.name)
                .ok_or_else(|| ScalingError::MissingColumn(fitted.name.clone()))?;
            let scaled = column.values().iter().map(|v| fitted.params.apply_cell(v)).collect();
            frame.insert_column(fitted.name.clone(), scaled)?;
        }
        Ok(frame)
    }
}

/// Partitions numeric columns into standard and min-max scaling groups
pub struct ScalerStage {
    config: ScalerConfig,
}

impl ScalerStage {
    /// Create a new scaler stage
    pub fn new(config: ScalerConfig) -> Self {
        Self { config }
    }

    /// Numeric columns that are neither labels, ordinals nor encoded categoricals
    pub fn eligible_columns<'a>(&self, frame: &'a Frame) -> Vec<&'a str> {
        frame
            .columns()
            .iter()
            .filter(|c| c.kind().is_numeric())
            .map(|c| c.name())
            .filter(|name| !self.is_excluded(name))
            .collect()
    }

    fn is_excluded(&self, name: &str) -> bool {
        name.ends_with(&self.config.excluded_suffix)
            || self.config.excluded_columns.iter().any(|c| c == name)
    }

    /// Method assigned to a column that is being scaled
    pub fn method_for(&self, name: &str) -> ScalingMethod {
        if self.config.standard_columns.iter().any(|c| c == name) {
            ScalingMethod::Standard
        } else {
            ScalingMethod::MinMax
        }
    }

    /// Fit scalers on `frame`; `columns` overrides the eligible set
    pub fn fit(
        &self,
        frame: &Frame,
        columns: Option<&[String]>,
    ) -> Result<FittedScalers, ScalingError> {
        let to_scale: Vec<&str> = match columns {
            Some(requested) => {
                for name in requested {
                    let column = frame
                        .column(name)
                        .ok_or_else(|| ScalingError::MissingColumn(name.clone()))?;
                    if !column.kind().is_numeric() {
                        return Err(ScalingError::NonNumericColumn(name.clone()));
                    }
                }
                requested.iter().map(String::as_str).collect()
            }
            None => self.eligible_columns(frame),
        };

        let mut fitted = Vec::with_capacity(to_scale.len());
        // Standard group first, then min-max, matching the order they are applied
        for method in [ScalingMethod::Standard, ScalingMethod::MinMax] {
            for name in to_scale.iter().filter(|name| self.method_for(name) == method) {
                let Some(column) = frame.column(name) else {
                    continue;
                };
                match ScalerParams::fit(method, &column.numbers()) {
                    Some(params) => {
                        debug!("Fitted {:?} scaler for {}: {:?}", method, name, params);
                        fitted.push(FittedColumn {
                            name: name.to_string(),
                            params,
                        });
                    }
                    None => warn!("Column {} has no values, left unscaled", name),
                }
            }
        }

        Ok(FittedScalers { columns: fitted })
    }

    /// Fit on `frame` and scale it in one pass
    pub fn fit_transform(
        &self,
        frame: Frame,
        columns: Option<&[String]>,
    ) -> Result<(Frame, FittedScalers), ScalingError> {
        let fitted = self.fit(&frame, columns)?;
        let standard = fitted.columns_with(ScalingMethod::Standard);
        if !standard.is_empty() {
            info!("Standard scaled: {:?}", standard);
        }
        let minmax = fitted.columns_with(ScalingMethod::MinMax);
        if !minmax.is_empty() {
            info!("Min-max scaled: {:?}", minmax);
        }
        let frame = fitted.transform(frame)?;
        Ok((frame, fitted))
    }
}

impl Default for ScalerStage {
    fn default() -> Self {
        Self::new(ScalerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_frame::Value;
    use proptest::prelude::*;

    fn frame() -> Frame {
        Frame::from_rows(
            &[
                "customer_id",
                TENURE,
                MONTHLY_CHARGES,
                "service_density",
                "gender_encoded",
                CHURN,
                TENURE_GROUP,
                "PhoneService_Yes",
            ],
            vec![
                vec![
                    "a".into(),
                    Value::Int(1),
                    Value::Float(20.0),
                    Value::Float(0.5),
                    Value::Int(1),
                    Value::Int(0),
                    Value::Int(0),
                    Value::Bool(true),
                ],
                vec![
                    "b".into(),
                    Value::Int(3),
                    Value::Float(40.0),
                    Value::Float(1.5),
                    Value::Int(0),
                    Value::Int(1),
                    Value::Int(2),
                    Value::Bool(false),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_eligible_columns_exclude_labels_and_encoded() {
        let stage = ScalerStage::default();
        let frame = frame();
        assert_eq!(
            stage.eligible_columns(&frame),
            vec![TENURE, MONTHLY_CHARGES, "service_density"]
        );
    }

    #[test]
    fn test_partition_into_two_groups() {
        let (scaled, fitted) = ScalerStage::default().fit_transform(frame(), None).unwrap();
        assert_eq!(
            fitted.columns_with(ScalingMethod::Standard),
            vec![TENURE, MONTHLY_CHARGES]
        );
        assert_eq!(fitted.columns_with(ScalingMethod::MinMax), vec!["service_density"]);

        // Two points at mean +/- 1 std dev
        assert_eq!(
            scaled.column(TENURE).unwrap().values(),
            &[Value::Float(-1.0), Value::Float(1.0)]
        );
        assert_eq!(
            scaled.column("service_density").unwrap().values(),
            &[Value::Float(0.0), Value::Float(1.0)]
        );

        // Untouched columns keep their raw cells
        assert_eq!(scaled.column(CHURN), frame().column(CHURN));
        assert_eq!(scaled.column("gender_encoded"), frame().column("gender_encoded"));
        assert_eq!(
            scaled.column("PhoneService_Yes"),
            frame().column("PhoneService_Yes")
        );
    }

    #[test]
    fn test_explicit_columns_override() {
        let requested = vec!["gender_encoded".to_string()];
        let (scaled, fitted) = ScalerStage::default()
            .fit_transform(frame(), Some(&requested))
            .unwrap();
        assert_eq!(fitted.columns().len(), 1);
        assert_eq!(scaled.column(TENURE), frame().column(TENURE));
        assert_eq!(
            scaled.column("gender_encoded").unwrap().values(),
            &[Value::Float(1.0), Value::Float(0.0)]
        );
    }

    #[test]
    fn test_explicit_columns_validated() {
        let stage = ScalerStage::default();
        let missing = vec!["nope".to_string()];
        assert!(matches!(
            stage.fit(&frame(), Some(&missing)),
            Err(ScalingError::MissingColumn(_))
        ));
        let text = vec!["customer_id".to_string()];
        assert!(matches!(
            stage.fit(&frame(), Some(&text)),
            Err(ScalingError::NonNumericColumn(_))
        ));
    }

    #[test]
    fn test_fitted_params_reapply_to_new_batch() {
        let stage = ScalerStage::default();
        let (_, fitted) = stage.fit_transform(frame(), None).unwrap();
        let again = fitted.transform(frame()).unwrap();
        let (refit, _) = stage.fit_transform(frame(), None).unwrap();
        assert_eq!(again, refit);
    }

    proptest! {
        #[test]
        fn prop_minmax_within_unit_interval(
            values in prop::collection::vec(-1.0e4f64..1.0e4, 1..50)
        ) {
            let rows = values.iter().map(|v| vec![Value::Float(*v)]).collect();
            let frame = Frame::from_rows(&["charges_per_tenure"], rows).unwrap();
            let (scaled, _) = ScalerStage::default().fit_transform(frame, None).unwrap();
            for cell in scaled.column("charges_per_tenure").unwrap().values() {
                let v = cell.as_f64().unwrap();
                prop_assert!((-1e-9..=1.0 + 1e-9).contains(&v));
            }
        }
    }
}
