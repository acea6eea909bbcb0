//! Grid Rasterization
//!
//! Maps variable-length layers onto the fixed `MODEL_STEP` depth grid.

use crate::error::FeatureError;
use crate::reconcile::ReconciledProfiles;
use crate::MODEL_STEP;
use profile_parser::Layer;
use tracing::debug;

/// Per-layer parameters as seen by the model
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerFeatures {
    pub mud_resistivity: f32,
    pub well_diameter: f32,
    pub invaded_resistivity: f32,
    /// `0.0` for anisotropic records
    pub invasion_diameter: f32,
    pub horizontal_resistivity: f32,
    pub vertical_resistivity: f32,
}

impl LayerFeatures {
    /// Feature row for a horizontal/vertical layer pair.
    ///
    /// Isotropic records carry all five parameters and share one formation
    /// resistivity. Anisotropic records have no invasion diameter and take
    /// formation resistivity from each profile separately.
    pub fn from_pair(index: usize, horizontal: &Layer, vertical: &Layer) -> Result<Self, FeatureError> {
        let p = horizontal.params();

        if horizontal.is_isotropic() {
            return Ok(Self {
                mud_resistivity: p[0],
                well_diameter: p[1],
                invaded_resistivity: p[2],
                invasion_diameter: p[3],
                horizontal_resistivity: p[4],
                vertical_resistivity: p[4],
            });
        }

        if p.len() < 3 {
            return Err(FeatureError::MalformedLayer {
                index,
                len: horizontal.record_len(),
                reason: "anisotropic record needs at least 3 parameters",
            });
        }
        let (Some(horizontal_resistivity), Some(vertical_resistivity)) =
            (horizontal.last_param(), vertical.last_param())
        else {
            return Err(FeatureError::MalformedLayer {
                index,
                len: vertical.record_len(),
                reason: "vertical record has no parameters",
            });
        };

        Ok(Self {
            mud_resistivity: p[0],
            well_diameter: p[1],
            invaded_resistivity: p[2],
            invasion_diameter: 0.0,
            horizontal_resistivity,
            vertical_resistivity,
        })
    }
}

/// Number of grid rows covering `[top, bottom]` inclusive
pub fn grid_rows(top: f64, bottom: f64) -> usize {
    ((bottom - top) / MODEL_STEP).round().max(0.0) as usize + 1
}

/// Row index of `depth` on a grid starting at `top`, clamped to the grid
pub fn grid_index(depth: f64, top: f64, rows: usize) -> usize {
    let index = ((depth - top) / MODEL_STEP).round();
    index.clamp(0.0, (rows - 1) as f64) as usize
}

/// Rasterize reconciled profiles: one [`LayerFeatures`] per grid row
pub fn rasterize(profiles: &ReconciledProfiles) -> Result<Vec<LayerFeatures>, FeatureError> {
    let top = profiles.top();
    let rows = grid_rows(top, profiles.bottom());
    let mut grid = vec![LayerFeatures::default(); rows];

    for (index, (h, v)) in profiles.pairs().enumerate() {
        let features = LayerFeatures::from_pair(index, h, v)?;
        let first = grid_index(f64::from(h.top), top, rows);
        let last = grid_index(f64::from(h.bottom), top, rows);
        // Shared boundary rows go to the deeper layer
        grid[first..=last.max(first)].fill(features);
    }

    debug!("Rasterized {} layers onto {} grid rows", profiles.horizontal.len(), rows);
    Ok(grid)
}
