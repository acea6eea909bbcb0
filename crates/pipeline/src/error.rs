//! Pipeline Error Types

use crate::output::OutputError;
use crate::postprocess::PostProcessError;
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use profile_parser::ProfileError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage a failure originated in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    ParseProfile,
    LoadDepths,
    Reconcile,
    Rasterize,
    Normalize,
    Inference,
    PostProcess,
    WriteOutput,
    Dispatch,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::ParseProfile => "parse_profile",
            Stage::LoadDepths => "load_depths",
            Stage::Reconcile => "reconcile",
            Stage::Rasterize => "rasterize",
            Stage::Normalize => "normalize",
            Stage::Inference => "inference",
            Stage::PostProcess => "post_process",
            Stage::WriteOutput => "write_output",
            Stage::Dispatch => "dispatch",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage-local failure cause
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    PostProcess(#[from] PostProcessError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("Worker task failed: {0}")]
    Dispatch(String),
}

/// Top-level failure of a `process_files` call
#[derive(Debug, Error)]
#[error("Processing failed at stage {stage}: {source}")]
pub struct ProcessingError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

/// Tag a stage result with the stage it came from
pub(crate) trait StageContext<T> {
    fn stage(self, stage: Stage) -> Result<T, ProcessingError>;
}

impl<T, E: Into<StageError>> StageContext<T> for Result<T, E> {
    fn stage(self, stage: Stage) -> Result<T, ProcessingError> {
        self.map_err(|e| ProcessingError {
            stage,
            source: e.into(),
        })
    }
}
