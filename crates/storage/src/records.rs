//! Stored record types

use crate::StorageError;
use feature_engine::columns::{CHURN, ENCODED_SUFFIX};
use feature_frame::{Frame, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Inferred feature kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Categorical,
    Numerical,
}

impl FeatureType {
    /// Encoded columns are categorical, everything else numerical
    pub fn infer(feature_name: &str) -> Self {
        if feature_name.ends_with(ENCODED_SUFFIX) {
            FeatureType::Categorical
        } else {
            FeatureType::Numerical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Categorical => "categorical",
            FeatureType::Numerical => "numerical",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "categorical" => Ok(FeatureType::Categorical),
            "numerical" => Ok(FeatureType::Numerical),
            other => Err(StorageError::InvalidRecord(format!("feature_type {}", other))),
        }
    }
}

/// One row of the feature catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMetadataRecord {
    pub feature_name: String,
    pub feature_type: FeatureType,
    pub description: String,
    pub transformation_applied: String,
    pub created_date: String,
}

impl FeatureMetadataRecord {
    pub(crate) const TRANSFORMATION: &'static str = "StandardScaler/LabelEncoder";

    pub fn new(feature_name: &str, created_date: String) -> Self {
        Self {
            feature_name: feature_name.to_string(),
            feature_type: FeatureType::infer(feature_name),
            description: format!("Feature: {}", feature_name),
            transformation_applied: Self::TRANSFORMATION.to_string(),
            created_date,
        }
    }
}

/// One materialized training snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSetRecord {
    pub set_id: String,
    pub set_name: String,
    pub creation_date: String,
    pub feature_count: i64,
    pub record_count: i64,
    pub target_distribution: String,
    pub data_quality_score: f64,
}

/// Identifier and CSV location of a created training set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSetHandle {
    pub set_id: String,
    pub output_path: PathBuf,
}

/// Label counts rendered as `{1: 3, 0: 7}`, most frequent first.
///
/// Returns `"No target"` when the frame has no `Churn` column.
pub fn target_distribution(frame: &Frame) -> String {
    let Some(column) = frame.column(CHURN) else {
        return "No target".to_string();
    };

    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in column.values().iter().filter(|v| !v.is_null()) {
        let key = distribution_key(value);
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let entries: Vec<String> = counts.iter().map(|(k, c)| format!("{}: {}", k, c)).collect();
    format!("{{{}}}", entries.join(", "))
}

fn distribution_key(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}
