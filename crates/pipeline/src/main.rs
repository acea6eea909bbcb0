//! Resistivity Pipeline - Command Line Entry Point

use clap::Parser;
use pipeline::{init_logging, Pipeline, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

/// Predict apparent resistivity curves from segmented borehole profiles
#[derive(Debug, Parser)]
#[command(name = "resistivity-pipeline", version, about)]
struct Args {
    /// Horizontal resistivity profile (.obl)
    #[arg(long)]
    roh: PathBuf,

    /// Vertical resistivity profile (.obl)
    #[arg(long)]
    rov: PathBuf,

    /// Depth file (header line, then one depth per line)
    #[arg(long)]
    z: PathBuf,

    /// Output file (a temporary predictions_*.dat file if omitted)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, env = "RESISTIVITY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = PipelineConfig::load(args.config.as_deref())?;
    init_logging(&config.log_level);

    info!("=== Resistivity Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Model: {}", config.model_path.display());

    let pipeline = Pipeline::from_config(&config);
    let path = pipeline
        .process_files_async(args.roh, args.rov, args.z, args.output)
        .await?;

    println!("{}", path.display());
    Ok(())
}
