//! Prediction Post-Processing
//!
//! Model output covers the padded window at the native grid step. Cut it back
//! to the requested depth span, undo the training-time log transform and
//! resample to the requested step.

use feature_engine::grid_rows;
use ndarray::{s, Array2, ArrayView3};
use profile_parser::DepthArray;
use thiserror::Error;
use tracing::debug;

/// Errors while mapping predictions back onto requested depths
#[derive(Debug, Clone, Error)]
pub enum PostProcessError {
    #[error("Unsupported depth step {step} (supported: 0.1, 0.2)")]
    UnsupportedStep { step: f64 },

    #[error("Model returned {available} rows, {needed} needed to cover the requested depths")]
    InsufficientRows { needed: usize, available: usize },

    #[error("Resampled {actual} rows for {expected} requested depths")]
    RowCountMismatch { expected: usize, actual: usize },
}

/// Requested depth sampling relative to the model grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingStep {
    /// 0.1, same as the model grid
    Native,
    /// 0.2, every other grid row
    Double,
}

impl SamplingStep {
    /// Detect the step from the first two depths, rounded to one decimal
    pub fn detect(depths: &DepthArray) -> Result<Self, PostProcessError> {
        let values = depths.values();
        let raw = f64::from(values[1]) - f64::from(values[0]);
        let step = (raw * 10.0).round() / 10.0;

        if (step - 0.1).abs() < 1e-9 {
            Ok(SamplingStep::Native)
        } else if (step - 0.2).abs() < 1e-9 {
            Ok(SamplingStep::Double)
        } else {
            Err(PostProcessError::UnsupportedStep { step: raw })
        }
    }

    fn stride(self) -> usize {
        match self {
            SamplingStep::Native => 1,
            SamplingStep::Double => 2,
        }
    }
}

/// Crop, exponentiate and resample raw `1 x rows x configs` predictions
pub fn postprocess(
    predictions: ArrayView3<'_, f32>,
    depths: &DepthArray,
    step: SamplingStep,
) -> Result<Array2<f32>, PostProcessError> {
    let crop = grid_rows(f64::from(depths.first()), f64::from(depths.last()));
    let available = predictions.dim().1;
    if available < crop {
        return Err(PostProcessError::InsufficientRows {
            needed: crop,
            available,
        });
    }

    let offset = (available - crop) / 2;
    let kept = predictions
        .slice(s![0, offset..offset + crop, ..])
        .mapv(f32::exp);

    let resampled = kept.slice(s![..;step.stride(), ..]).to_owned();
    if resampled.nrows() != depths.len() {
        return Err(PostProcessError::RowCountMismatch {
            expected: depths.len(),
            actual: resampled.nrows(),
        });
    }

    debug!(
        "Post-processed {} model rows -> {} output rows (offset {}, {:?})",
        available,
        resampled.nrows(),
        offset,
        step
    );
    Ok(resampled)
}
