//! Feature Assembly Error Types

use thiserror::Error;

/// Errors while turning layer sequences into model features
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    /// Horizontal and vertical profiles do not line up
    #[error("Layer count mismatch: {horizontal} horizontal vs {vertical} vertical layers")]
    LayerCountMismatch { horizontal: usize, vertical: usize },

    /// No layers to work with
    #[error("Profile contains no layers")]
    EmptyProfile,

    /// Requested window misses the profile entirely
    #[error(
        "Depth window [{start}, {end}] does not overlap profile span [{profile_top}, {profile_bottom}]"
    )]
    InvalidRange {
        start: f64,
        end: f64,
        profile_top: f64,
        profile_bottom: f64,
    },

    /// Layer record cannot be turned into a feature row
    #[error("Layer {index} ({len} values) is malformed: {reason}")]
    MalformedLayer {
        index: usize,
        len: usize,
        reason: &'static str,
    },

    /// Distance features do not cover the grid
    #[error("Row count mismatch: {grid} grid rows vs {distances} distance rows")]
    RowCountMismatch { grid: usize, distances: usize },

    /// Logarithm of a non-positive value
    #[error("Cannot log-scale {column} at row {row}: value {value} is not positive")]
    Domain {
        column: &'static str,
        row: usize,
        value: f32,
    },
}
