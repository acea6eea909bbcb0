//! Inference Engine Implementation

use crate::InferenceError;
use feature_engine::FEATURE_DIMENSION;
use ndarray::{Array3, ArrayView3};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;
use tracing::{debug, error, info};
use tract_onnx::prelude::*;

/// Source-receiver configurations, in model output column order
pub const SOURCE_RECEIVER_CONFIGS: [&str; 6] = [
    "A0.4M0.1N",
    "A1.0M0.1N",
    "A2.0M0.5N",
    "A-2.0M0.5N",
    "A4.0M0.5N",
    "A8.0M1.0N",
];

/// Number of model output columns
pub const OUTPUT_CONFIGS: usize = SOURCE_RECEIVER_CONFIGS.len();

/// Regression model mapping `1 x rows x 8` features to `1 x rows x 6` predictions
pub trait Regressor: Send + Sync {
    fn predict(&self, features: ArrayView3<'_, f32>) -> Result<Array3<f32>, InferenceError>;
}

type RunFn = dyn Fn(Tensor) -> TractResult<TVec<TValue>> + Send + Sync;

/// Optimized tract plan, erased to its run entry point
struct OnnxSession {
    run: Box<RunFn>,
}

/// ONNX inference engine. Loads the model at most once, on first prediction.
pub struct InferenceEngine {
    /// Model path
    model_path: PathBuf,
    /// Loaded session, shared by all callers
    session: OnceLock<OnnxSession>,
    /// Serializes the one-time load
    init: Mutex<()>,
}

impl InferenceEngine {
    /// Create an engine for the model at `model_path` without loading it
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        let model_path = model_path.into();
        info!("Creating inference engine with model: {}", model_path.display());

        Self {
            model_path,
            session: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Load the ONNX model if it is not loaded yet.
    ///
    /// Concurrent first calls block on the init lock; exactly one of them loads.
    /// A failed load is not cached, the next call retries.
    pub fn load(&self) -> Result<(), InferenceError> {
        self.session().map(|_| ())
    }

    fn session(&self) -> Result<&OnnxSession, InferenceError> {
        if let Some(session) = self.session.get() {
            return Ok(session);
        }

        let _guard = self
            .init
            .lock()
            .map_err(|e| InferenceError::ModelLoadError(format!("Lock error: {}", e)))?;

        if let Some(session) = self.session.get() {
            return Ok(session);
        }

        let session = self.load_session()?;
        Ok(self.session.get_or_init(|| session))
    }

    fn load_session(&self) -> Result<OnnxSession, InferenceError> {
        if !self.model_path.is_file() {
            error!("Model file missing: {}", self.model_path.display());
            return Err(InferenceError::ModelNotFound(
                self.model_path.display().to_string(),
            ));
        }

        let start = Instant::now();
        let plan = tract_onnx::onnx()
            .model_for_path(&self.model_path)
            .map_err(|e| InferenceError::ModelLoadError(format!("Failed to read ONNX model: {}", e)))?
            .into_optimized()
            .map_err(|e| InferenceError::ModelLoadError(format!("Model optimization failed: {}", e)))?
            .into_runnable()
            .map_err(|e| InferenceError::ModelLoadError(format!("Model not runnable: {}", e)))?;

        info!(
            "Model loaded from {} in {}ms",
            self.model_path.display(),
            start.elapsed().as_millis()
        );

        Ok(OnnxSession {
            run: Box::new(move |input: Tensor| plan.run(tvec!(input.into()))),
        })
    }

    /// Check if the model is loaded
    pub fn is_loaded(&self) -> bool {
        self.session.get().is_some()
    }

    /// Get model path
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl Regressor for InferenceEngine {
    fn predict(&self, features: ArrayView3<'_, f32>) -> Result<Array3<f32>, InferenceError> {
        let (batch, rows, columns) = features.dim();
        if batch != 1 || rows == 0 || columns != FEATURE_DIMENSION {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, N, {}]", FEATURE_DIMENSION),
                actual: format!("{:?}", features.shape()),
            });
        }

        let session = self.session()?;
        let start = Instant::now();

        let data: Vec<f32> = features.iter().copied().collect();
        let input = Tensor::from_shape(&[batch, rows, columns], &data)
            .map_err(|e| InferenceError::InferenceFailed(format!("Failed to create tensor: {}", e)))?;

        let outputs = (session.run)(input)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("No output tensors".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(format!("Output is not f32: {}", e)))?;

        let shape = view.shape().to_vec();
        if shape.len() != 3 || shape[0] != 1 || shape[2] != OUTPUT_CONFIGS {
            return Err(InferenceError::InvalidOutputShape {
                expected: format!("[1, N, {}]", OUTPUT_CONFIGS),
                actual: format!("{:?}", shape),
            });
        }

        let predictions = Array3::from_shape_vec((1, shape[1], shape[2]), view.iter().copied().collect())
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        debug!(
            "Inference over {} rows completed in {}ms",
            rows,
            start.elapsed().as_millis()
        );
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lazy_engine_not_loaded() {
        let engine = InferenceEngine::new("models/missing.onnx");
        assert!(!engine.is_loaded());
        assert_eq!(engine.model_path(), Path::new("models/missing.onnx"));
    }

    #[test]
    fn test_missing_model() {
        let engine = InferenceEngine::new("/nonexistent/model.onnx");
        let err = engine.load().unwrap_err();
        assert!(matches!(err, InferenceError::ModelNotFound(_)));
        assert!(!engine.is_loaded());
    }

    #[test]
    fn test_corrupt_model_is_load_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not protobuf").unwrap();

        let engine = InferenceEngine::new(file.path());
        let err = engine.load().unwrap_err();
        assert!(matches!(err, InferenceError::ModelLoadError(_)));
    }

    #[test]
    fn test_input_shape_checked_before_load() {
        let engine = InferenceEngine::new("/nonexistent/model.onnx");
        let features = Array3::<f32>::zeros((1, 10, 5));
        let err = engine.predict(features.view()).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidInputShape { .. }));
    }

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
    }

    /// Row `r`, column `c` holds `r * 10 + c`
    fn ramp(rows: usize) -> Array3<f32> {
        Array3::from_shape_fn((1, rows, FEATURE_DIMENSION), |(_, r, c)| (r * 10 + c) as f32)
    }

    #[test]
    fn test_predict_runs_model() {
        // Identity projection onto the first six feature columns
        let engine = InferenceEngine::new(fixture("projection_8x6.onnx"));
        assert!(!engine.is_loaded());

        let features = ramp(12);
        let predictions = engine.predict(features.view()).unwrap();
        assert!(engine.is_loaded());

        assert_eq!(predictions.dim(), (1, 12, OUTPUT_CONFIGS));
        for r in 0..12 {
            for c in 0..OUTPUT_CONFIGS {
                assert!((predictions[[0, r, c]] - features[[0, r, c]]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_predict_any_row_count() {
        let engine = InferenceEngine::new(fixture("projection_8x6.onnx"));
        for rows in [1, 7, 419] {
            let predictions = engine.predict(ramp(rows).view()).unwrap();
            assert_eq!(predictions.dim(), (1, rows, OUTPUT_CONFIGS));
        }
    }

    #[test]
    fn test_wrong_output_width() {
        let engine = InferenceEngine::new(fixture("projection_8x5.onnx"));
        let err = engine.predict(ramp(4).view()).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidOutputShape { .. }));
    }

    #[test]
    fn test_failed_load_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        let engine = InferenceEngine::new(&path);

        assert!(matches!(engine.load(), Err(InferenceError::ModelNotFound(_))));
        std::fs::copy(fixture("projection_8x6.onnx"), &path).unwrap();
        engine.load().unwrap();
        assert!(engine.is_loaded());
    }

    #[test]
    fn test_concurrent_first_calls_share_session() {
        let engine = InferenceEngine::new(fixture("projection_8x6.onnx"));
        let threads = 8;
        let barrier = std::sync::Barrier::new(threads);

        let sessions: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|i| {
                    let engine = &engine;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        let predictions = engine.predict(ramp(i + 1).view()).unwrap();
                        assert_eq!(predictions.dim(), (1, i + 1, OUTPUT_CONFIGS));
                        engine.session().unwrap() as *const OnnxSession as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(engine.is_loaded());
        assert!(sessions.iter().all(|&s| s == sessions[0]));
    }

    #[test]
    fn test_config_names() {
        assert_eq!(OUTPUT_CONFIGS, 6);
        assert_eq!(SOURCE_RECEIVER_CONFIGS[3], "A-2.0M0.5N");
    }
}
