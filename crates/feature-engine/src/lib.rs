//! Feature Engineering Engine
//!
//! Turns paired horizontal/vertical layer sequences into the dense, log-scaled
//! feature matrix the resistivity model consumes:
//! reconcile -> rasterize -> boundary distances -> assemble -> normalize.

mod boundary;
mod error;
mod normalize;
mod raster;
mod reconcile;
mod schema;

pub use boundary::{boundary_distances, BoundaryDistance};
pub use error::FeatureError;
pub use normalize::normalize;
pub use raster::{grid_index, grid_rows, rasterize, LayerFeatures};
pub use reconcile::{reconcile, reconcile_sequence, DepthWindow, ReconciledProfiles};
pub use schema::{FeatureColumn, FeatureMatrix, FEATURE_DIMENSION, FEATURE_SCHEMA};

/// Native depth step of the model grid
pub const MODEL_STEP: f64 = 0.1;

/// Padding added above and below the requested depths
pub const WINDOW_PADDING: f64 = 20.0;

/// Boundary distances beyond this are not informative
pub const DISTANCE_THRESHOLD: f64 = 1.0;

/// Depth comparison tolerance
pub const TOLERANCE: f64 = 1e-4;

/// Distance value for "no boundary within threshold"
pub const NO_BOUNDARY: f64 = -1.0;

/// Invasion diameter value for records without an invaded zone
pub const NO_INVASION: f32 = -1.0;
