//! Transformation Pipeline Driver

use crate::config::PipelineConfig;
use crate::discovery::discover_latest;
use crate::error::PipelineError;
use crate::logging::stage_span;
use feature_engine::FeatureEngineer;
use feature_frame::Frame;
use feature_scaler::{FittedScalers, ScalerStage, ScalingMethod};
use serde::Serialize;
use std::path::{Path, PathBuf};
use storage::{FeatureRepository, TrainingSetHandle};
use tracing::{error, info, Instrument, Span};

/// Outcome of one transformation run
#[derive(Debug, Clone)]
pub struct TransformationReport {
    /// Input file, when the run started from one
    pub input_path: Option<PathBuf>,
    /// Engineered features before scaling
    pub engineered: Frame,
    /// Scaled features as written to the store
    pub transformed: Frame,
    /// Parameters fitted for this run
    pub scalers: FittedScalers,
    pub training_set: TrainingSetHandle,
}

/// Serializable digest of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: Option<PathBuf>,
    pub rows: usize,
    pub columns: usize,
    pub set_id: String,
    pub training_set: PathBuf,
    pub standard_scaled: Vec<String>,
    pub minmax_scaled: Vec<String>,
}

impl TransformationReport {
    pub fn summary(&self) -> RunSummary {
        let names = |method: ScalingMethod| -> Vec<String> {
            self.scalers
                .columns_with(method)
                .into_iter()
                .map(String::from)
                .collect()
        };
        RunSummary {
            input: self.input_path.clone(),
            rows: self.transformed.row_count(),
            columns: self.transformed.column_count(),
            set_id: self.training_set.set_id.clone(),
            training_set: self.training_set.output_path.clone(),
            standard_scaled: names(ScalingMethod::Standard),
            minmax_scaled: names(ScalingMethod::MinMax),
        }
    }
}

/// Runs engineering, scaling, persistence and training set creation
/// against one feature store.
pub struct TransformationPipeline {
    config: PipelineConfig,
    engineer: FeatureEngineer,
    scaler: ScalerStage,
    repository: FeatureRepository,
    span: Span,
}

impl TransformationPipeline {
    /// Open the configured store and build the stages
    pub async fn open(config: PipelineConfig) -> Result<Self, PipelineError> {
        let repository = FeatureRepository::open(&config.storage).await?;
        Self::from_parts(config, repository)
    }

    /// Build the stages around an already opened repository
    pub fn from_parts(
        config: PipelineConfig,
        repository: FeatureRepository,
    ) -> Result<Self, PipelineError> {
        config.engine.validate()?;
        Ok(Self {
            engineer: FeatureEngineer::new(config.engine.clone()),
            scaler: ScalerStage::new(config.scaler.clone()),
            config,
            repository,
            span: stage_span(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn repository_mut(&mut self) -> &mut FeatureRepository {
        &mut self.repository
    }

    /// Use the configured input, or discover the newest CSV
    pub async fn run_auto(&mut self) -> Result<TransformationReport, PipelineError> {
        let span = self.span.clone();
        async {
            let path = match &self.config.input {
                Some(path) => {
                    info!("Using configured input: {}", path.display());
                    path.clone()
                }
                None => discover_latest(&self.config.input_dirs)?,
            };
            self.load_and_run(&path).await
        }
        .instrument(span)
        .await
    }

    /// Run on an explicit CSV file
    pub async fn run_file(&mut self, path: &Path) -> Result<TransformationReport, PipelineError> {
        let span = self.span.clone();
        self.load_and_run(path).instrument(span).await
    }

    /// Run on an in-memory frame
    pub async fn run_frame(&mut self, frame: Frame) -> Result<TransformationReport, PipelineError> {
        let span = self.span.clone();
        self.run(frame, None).instrument(span).await
    }

    async fn load_and_run(&mut self, path: &Path) -> Result<TransformationReport, PipelineError> {
        let frame = Frame::read_csv(path)?;
        info!(
            "Loaded {} ({} rows, {} columns)",
            path.display(),
            frame.row_count(),
            frame.column_count()
        );
        self.run(frame, Some(path.to_path_buf())).await
    }

    async fn run(
        &mut self,
        frame: Frame,
        input_path: Option<PathBuf>,
    ) -> Result<TransformationReport, PipelineError> {
        info!("Starting transformation pipeline");
        let engineered = self.engineer.engineer(frame)?;
        let (scaled, scalers) = self.scaler.fit_transform(engineered.clone(), None)?;
        let transformed = self.repository.store_transformed(scaled).await?;
        let training_set = self
            .repository
            .create_training_set(&self.config.training_set_name, None)
            .await?;
        info!("Transformation pipeline completed: {}", training_set.output_path.display());

        Ok(TransformationReport {
            input_path,
            engineered,
            transformed,
            scalers,
            training_set,
        })
    }

    /// Run once with [`run_auto`](Self::run_auto), then close the store.
    ///
    /// A run failure is returned as is; a close failure after it is only logged.
    pub async fn run_and_close(mut self) -> Result<TransformationReport, PipelineError> {
        match self.run_auto().await {
            Ok(report) => {
                self.close().await?;
                Ok(report)
            }
            Err(e) => {
                error!("Transformation failed: {}", e);
                if let Err(close_err) = self.close().await {
                    error!("Failed to close feature store: {}", close_err);
                }
                Err(e)
            }
        }
    }

    /// Close the feature store connection
    pub async fn close(self) -> Result<(), PipelineError> {
        self.repository.close().await?;
        Ok(())
    }
}
