//! Depth File Loader

use crate::error::{DepthError, ProfileError};
use std::path::Path;
use tracing::debug;

/// Allowed deviation of any step from the first one, relative to the first step
pub const STEP_TOLERANCE: f32 = 0.05;

/// Requested output depths, strictly increasing at a uniform step
#[derive(Debug, Clone, PartialEq)]
pub struct DepthArray {
    values: Vec<f32>,
}

impl DepthArray {
    /// Load a depth file: one header line, then one depth per line
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path).map_err(|e| ProfileError::io(path, e))?;
        Self::parse(&text, path)
    }

    /// Parse depth file text. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ProfileError> {
        let mut values = Vec::new();

        for (line_no, line) in text.lines().enumerate().skip(1) {
            let mut fields = line.split_whitespace();
            let Some(raw) = fields.next() else {
                continue;
            };
            if let Some(extra) = fields.next() {
                return Err(ProfileError::Parse {
                    path: origin.to_path_buf(),
                    line: line_no + 1,
                    token: extra.to_string(),
                });
            }
            let depth: f32 = raw.parse().map_err(|_| ProfileError::Parse {
                path: origin.to_path_buf(),
                line: line_no + 1,
                token: raw.to_string(),
            })?;
            values.push(depth);
        }

        Self::new(values).map_err(|source| ProfileError::InvalidDepths {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Validate raw depths
    pub fn new(values: Vec<f32>) -> Result<Self, DepthError> {
        if values.len() < 2 {
            return Err(DepthError::TooFew {
                found: values.len(),
            });
        }
        if let Some(w) = values.windows(2).find(|w| w[1] <= w[0]) {
            return Err(DepthError::NotIncreasing {
                previous: w[0],
                next: w[1],
            });
        }

        let expected = values[1] - values[0];
        let tolerance = expected * STEP_TOLERANCE;
        if let Some(w) = values
            .windows(2)
            .find(|w| ((w[1] - w[0]) - expected).abs() > tolerance)
        {
            return Err(DepthError::NonUniformStep {
                previous: w[0],
                next: w[1],
                expected,
                found: w[1] - w[0],
            });
        }
        debug!(
            "Depth array: {} points from {} to {}",
            values.len(),
            values[0],
            values[values.len() - 1]
        );
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Spacing between consecutive depths
    pub fn step(&self) -> f32 {
        self.values[1] - self.values[0]
    }

    /// Shallowest requested depth
    pub fn first(&self) -> f32 {
        self.values[0]
    }

    /// Deepest requested depth
    pub fn last(&self) -> f32 {
        self.values[self.values.len() - 1]
    }
}
