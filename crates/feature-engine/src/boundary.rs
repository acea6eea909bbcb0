//! Boundary-Distance Features
//!
//! For every grid row, the distance up to the top of the layer it sits in and
//! down to the next boundary. Distances beyond [`DISTANCE_THRESHOLD`] carry no
//! signal for the model and are replaced by [`NO_BOUNDARY`].

use crate::error::FeatureError;
use crate::{DISTANCE_THRESHOLD, MODEL_STEP, NO_BOUNDARY, TOLERANCE};
use tracing::debug;

/// Distance pair for one grid row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryDistance {
    pub to_prev: f32,
    pub to_next: f32,
}

/// Compute distance features for `rows` grid rows starting at `boundaries[0]`
pub fn boundary_distances(rows: usize, boundaries: &[f64]) -> Result<Vec<BoundaryDistance>, FeatureError> {
    let Some(&origin) = boundaries.first() else {
        return Err(FeatureError::EmptyProfile);
    };

    let mut cursor = 0usize;
    let mut distances = Vec::with_capacity(rows);

    for row in 0..rows {
        let position = origin + row as f64 * MODEL_STEP;

        // Move past every boundary the position has crossed
        while cursor + 1 < boundaries.len() && position > boundaries[cursor + 1] + TOLERANCE {
            cursor += 1;
        }
        // Sitting on an inner boundary starts the next segment
        if cursor + 2 < boundaries.len() && (position - boundaries[cursor + 1]).abs() < TOLERANCE {
            cursor += 1;
        }

        let current_start = boundaries[cursor];
        let to_next = match boundaries.get(cursor + 1) {
            Some(next) => cap(next - position),
            None => NO_BOUNDARY,
        };
        let to_prev = cap(position - current_start);

        distances.push(BoundaryDistance {
            to_prev: to_prev as f32,
            to_next: to_next as f32,
        });
    }

    debug!("Computed boundary distances for {} rows over {} boundaries", rows, boundaries.len());
    Ok(distances)
}

fn cap(distance: f64) -> f64 {
    if distance.abs() < TOLERANCE {
        0.0
    } else if distance > DISTANCE_THRESHOLD + TOLERANCE {
        NO_BOUNDARY
    } else {
        distance
    }
}
