//! ONNX Inference Engine
//!
//! Wraps the pretrained resistivity regressor behind the [`Regressor`] trait.
//! The ONNX session is loaded lazily on first use and shared read-only.

mod engine;

pub use engine::{InferenceEngine, Regressor, OUTPUT_CONFIGS, SOURCE_RECEIVER_CONFIGS};

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model file not found: {0}")]
    ModelNotFound(String),
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Invalid output shape: expected {expected}, got {actual}")]
    InvalidOutputShape { expected: String, actual: String },
}
