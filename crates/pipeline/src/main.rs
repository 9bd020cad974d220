//! Churn Transformation Stage - Main Entry Point

use anyhow::Context;
use clap::Parser;
use pipeline::{init_logging, PipelineConfig, TransformationPipeline};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "churn-transform",
    version,
    about = "Transform cleaned churn data into stored features and a training set"
)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV; skips discovery
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// SQLite database path
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Training set name
    #[arg(long)]
    set_name: Option<String>,

    /// Log directory; pass an empty string for console only
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut PipelineConfig) {
        if let Some(input) = self.input {
            config.input = Some(input);
        }
        if let Some(db_path) = self.db_path {
            config.storage.db_path = db_path;
        }
        if let Some(set_name) = self.set_name {
            config.training_set_name = set_name;
        }
        if let Some(log_dir) = self.log_dir {
            config.logging.log_dir = (!log_dir.as_os_str().is_empty()).then_some(log_dir);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = PipelineConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut config);

    let _guard = init_logging(&config.logging)?;
    info!("=== Churn Transformation v{} ===", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building runtime")?;

    runtime.block_on(async {
        let db_path = config.storage.db_path.clone();
        let pipeline = TransformationPipeline::open(config).await?;
        let report = pipeline.run_and_close().await?;

        println!("{}", serde_json::to_string_pretty(&report.summary())?);
        info!("Database: {}", db_path.display());
        info!("Pipeline completed");
        Ok::<(), anyhow::Error>(())
    })
}
