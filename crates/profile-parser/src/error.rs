//! Profile Parsing Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading profile and depth files
#[derive(Debug, Error)]
pub enum ProfileError {
    /// File missing or unreadable
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Token is not a number
    #[error("{}:{line}: invalid numeric token '{token}'", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    /// Layer too short to carry its depth span
    #[error("Layer {index} has {len} values, expected at least 2 (top and bottom depth)")]
    MalformedLayer { index: usize, len: usize },

    /// Depth file parsed but unusable
    #[error("Invalid depth file {}: {source}", path.display())]
    InvalidDepths {
        path: PathBuf,
        #[source]
        source: DepthError,
    },
}

/// Depth values that cannot serve as an output grid
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DepthError {
    #[error("need at least 2 depths, found {found}")]
    TooFew { found: usize },

    #[error("depths must be strictly increasing ({previous} followed by {next})")]
    NotIncreasing { previous: f32, next: f32 },

    #[error("depth step {found} between {previous} and {next} differs from the first step {expected}")]
    NonUniformStep {
        previous: f32,
        next: f32,
        expected: f32,
        found: f32,
    },
}

impl ProfileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProfileError::Io {
            path: path.into(),
            source,
        }
    }
}
