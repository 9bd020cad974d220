//! Pipeline configuration

use crate::error::PipelineError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use feature_engine::EngineConfig;
use feature_scaler::ScalerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storage::StorageConfig;

/// Environment variable prefix; nested keys use `__`, e.g. `CHURN__STORAGE__DB_PATH`
pub const ENV_PREFIX: &str = "CHURN";

/// Training set name used when none is configured
pub const DEFAULT_TRAINING_SET: &str = "churn_prediction_v1";

/// Transformation stage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directories searched in order for the input CSV
    pub input_dirs: Vec<PathBuf>,
    /// Explicit input file; skips discovery when set
    pub input: Option<PathBuf>,
    /// Name prefix of the training set created on each run
    pub training_set_name: String,
    pub storage: StorageConfig,
    pub engine: EngineConfig,
    pub scaler: ScalerConfig,
    pub logging: LoggingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dirs: vec![PathBuf::from("data/cleaned"), PathBuf::from("data/processed")],
            input: None,
            training_set_name: DEFAULT_TRAINING_SET.to_string(),
            storage: StorageConfig::default(),
            engine: EngineConfig::default(),
            scaler: ScalerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Resolve defaults, then an optional file, then `CHURN__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("input_dirs")
            .try_parsing(true);
        Self::load_with(path, environment)
    }

    fn load_with(path: Option<&Path>, environment: Environment) -> Result<Self, PipelineError> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&PipelineConfig::default())?);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config: PipelineConfig = builder.add_source(environment).build()?.try_deserialize()?;
        config.engine.validate()?;
        Ok(config)
    }
}
