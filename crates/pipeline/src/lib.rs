//! Resistivity Prediction Pipeline
//!
//! Turns a pair of segmented resistivity profiles (`roH`, `roV`) and a depth
//! file (`z`) into per-depth resistivity predictions for six source-receiver
//! configurations.
//!
//! Every call is independent and synchronous; only the inference session is
//! shared. Async callers should use [`Pipeline::process_files_async`], which
//! runs the work on the blocking pool.

mod error;
mod output;
mod postprocess;
mod settings;

pub use error::{ProcessingError, Stage, StageError};
pub use output::{format_depth, header, render, write_predictions, OutputError};
pub use postprocess::{postprocess, PostProcessError, SamplingStep};
pub use settings::{PipelineConfig, DEFAULT_MODEL_PATH, ENV_PREFIX};

use error::StageContext;
use feature_engine::{
    boundary_distances, normalize, rasterize, reconcile, DepthWindow, FeatureMatrix,
};
use inference_engine::{InferenceEngine, Regressor};
use metrics::{counter, histogram};
use ndarray::Axis;
use profile_parser::{load_layers, DepthArray, InputKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Profile-to-prediction pipeline with an injected, shared regressor
#[derive(Clone)]
pub struct Pipeline {
    regressor: Arc<dyn Regressor>,
    output_dir: Option<PathBuf>,
}

impl Pipeline {
    /// Create a pipeline around an already constructed regressor
    pub fn new(regressor: Arc<dyn Regressor>) -> Self {
        Self {
            regressor,
            output_dir: None,
        }
    }

    /// Create a pipeline backed by the lazily loaded ONNX model from `config`
    pub fn from_config(config: &PipelineConfig) -> Self {
        let engine = InferenceEngine::new(&config.model_path);
        Self {
            regressor: Arc::new(engine),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Directory for generated output files
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Run the full pipeline and write the output file.
    ///
    /// With `output_path` unset a fresh `predictions_*.dat` file is created.
    /// Returns the path of the written file.
    pub fn process_files(
        &self,
        roh_path: &Path,
        rov_path: &Path,
        z_path: &Path,
        output_path: Option<&Path>,
    ) -> Result<PathBuf, ProcessingError> {
        let start = Instant::now();
        counter!("pipeline_requests_total").increment(1);

        let result = self.run(roh_path, rov_path, z_path, output_path);

        histogram!("pipeline_duration_seconds").record(start.elapsed().as_secs_f64());
        match &result {
            Ok(path) => info!(
                "Processed {} in {}ms -> {}",
                roh_path.display(),
                start.elapsed().as_millis(),
                path.display()
            ),
            Err(e) => {
                counter!("pipeline_failures_total", "stage" => e.stage.as_str()).increment(1);
                error!("{}", e);
            }
        }
        result
    }

    /// [`Pipeline::process_files`] on the blocking thread pool
    pub async fn process_files_async(
        &self,
        roh_path: PathBuf,
        rov_path: PathBuf,
        z_path: PathBuf,
        output_path: Option<PathBuf>,
    ) -> Result<PathBuf, ProcessingError> {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || {
            pipeline.process_files(&roh_path, &rov_path, &z_path, output_path.as_deref())
        })
        .await
        .map_err(|e| ProcessingError {
            stage: Stage::Dispatch,
            source: StageError::Dispatch(e.to_string()),
        })?
    }

    fn run(
        &self,
        roh_path: &Path,
        rov_path: &Path,
        z_path: &Path,
        output_path: Option<&Path>,
    ) -> Result<PathBuf, ProcessingError> {
        let inputs = [
            (roh_path, InputKind::HorizontalProfile),
            (rov_path, InputKind::VerticalProfile),
            (z_path, InputKind::Depth),
        ];
        for (path, expected) in inputs {
            if !path.is_file() {
                return Err(StageError::InputNotFound(path.to_path_buf())).stage(Stage::Validate);
            }
            let detected = InputKind::detect(path);
            if detected != expected && detected != InputKind::Unknown {
                warn!(
                    "{} looks like a {} file but is used as {}",
                    path.display(),
                    detected.as_str(),
                    expected.as_str()
                );
            }
        }

        let horizontal = load_layers(roh_path).stage(Stage::ParseProfile)?;
        let vertical = load_layers(rov_path).stage(Stage::ParseProfile)?;
        let depths = DepthArray::from_path(z_path).stage(Stage::LoadDepths)?;
        // Fail on an unsupported step before paying for inference
        let step = SamplingStep::detect(&depths).stage(Stage::PostProcess)?;
        info!(
            "Loaded {} horizontal / {} vertical layers, {} depths ({} .. {})",
            horizontal.len(),
            vertical.len(),
            depths.len(),
            depths.first(),
            depths.last()
        );

        let profiles = reconcile(horizontal, vertical, DepthWindow::around(&depths))
            .stage(Stage::Reconcile)?;

        let grid = rasterize(&profiles).stage(Stage::Rasterize)?;
        let distances = boundary_distances(grid.len(), &profiles.boundaries).stage(Stage::Rasterize)?;
        let mut features = FeatureMatrix::assemble(&grid, &distances).stage(Stage::Rasterize)?;
        normalize(&mut features).stage(Stage::Normalize)?;
        info!("Built feature matrix: {} rows", features.rows());

        let input = features.into_array().insert_axis(Axis(0));
        let raw = self.regressor.predict(input.view()).stage(Stage::Inference)?;

        let predictions = postprocess(raw.view(), &depths, step).stage(Stage::PostProcess)?;

        write_predictions(
            &depths,
            predictions.view(),
            output_path,
            self.output_dir.as_deref(),
        )
        .stage(Stage::WriteOutput)
    }
}

/// Install the global fmt subscriber with the given filter directive.
///
/// An unparsable directive falls back to `info` and is reported once the
/// subscriber is up.
pub fn init_logging(level: &str) {
    let (filter, rejected) = log_filter(level);
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        warn!("Tracing subscriber already installed");
        return;
    }
    if let Some(e) = rejected {
        warn!("Invalid log level '{}' ({}), using info", level, e);
    }
}

fn log_filter(level: &str) -> (EnvFilter, Option<ParseError>) {
    match EnvFilter::try_new(level) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new("info"), Some(e)),
    }
}
