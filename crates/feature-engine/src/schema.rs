//! Model Input Schema
//!
//! The network was trained on a fixed 8-column layout. Columns are addressed
//! by name everywhere; [`FEATURE_SCHEMA`] is the only place their order lives.

use crate::boundary::BoundaryDistance;
use crate::error::FeatureError;
use crate::raster::LayerFeatures;
use ndarray::{Array2, ArrayView2};

/// Number of model input columns
pub const FEATURE_DIMENSION: usize = 8;

/// Semantic name of a model input column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    /// Distance up to the current layer's top boundary
    DistToPrev,
    /// Distance down to the next layer boundary
    DistToNext,
    /// First layer parameter (borehole fluid resistivity)
    MudResistivity,
    /// Second layer parameter (borehole diameter)
    WellDiameter,
    /// Third layer parameter (invaded zone resistivity)
    InvadedResistivity,
    /// Fourth layer parameter, absent for anisotropic records
    InvasionDiameter,
    /// Vertical formation resistivity
    VerticalResistivity,
    /// Horizontal formation resistivity
    HorizontalResistivity,
}

/// Column order expected by the model
pub const FEATURE_SCHEMA: [FeatureColumn; FEATURE_DIMENSION] = [
    FeatureColumn::DistToPrev,
    FeatureColumn::DistToNext,
    FeatureColumn::MudResistivity,
    FeatureColumn::WellDiameter,
    FeatureColumn::InvadedResistivity,
    FeatureColumn::InvasionDiameter,
    FeatureColumn::VerticalResistivity,
    FeatureColumn::HorizontalResistivity,
];

impl FeatureColumn {
    /// Position in [`FEATURE_SCHEMA`]
    pub fn index(self) -> usize {
        match self {
            FeatureColumn::DistToPrev => 0,
            FeatureColumn::DistToNext => 1,
            FeatureColumn::MudResistivity => 2,
            FeatureColumn::WellDiameter => 3,
            FeatureColumn::InvadedResistivity => 4,
            FeatureColumn::InvasionDiameter => 5,
            FeatureColumn::VerticalResistivity => 6,
            FeatureColumn::HorizontalResistivity => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureColumn::DistToPrev => "dist_to_prev",
            FeatureColumn::DistToNext => "dist_to_next",
            FeatureColumn::MudResistivity => "mud_resistivity",
            FeatureColumn::WellDiameter => "well_diameter",
            FeatureColumn::InvadedResistivity => "invaded_resistivity",
            FeatureColumn::InvasionDiameter => "invasion_diameter",
            FeatureColumn::VerticalResistivity => "vertical_resistivity",
            FeatureColumn::HorizontalResistivity => "horizontal_resistivity",
        }
    }

    /// Whether the model sees this column in natural-log scale
    pub fn is_log_scaled(self) -> bool {
        matches!(
            self,
            FeatureColumn::MudResistivity
                | FeatureColumn::InvadedResistivity
                | FeatureColumn::VerticalResistivity
                | FeatureColumn::HorizontalResistivity
        )
    }
}

/// Dense model input: one row per grid step, columns per [`FEATURE_SCHEMA`]
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Array2<f32>,
}

impl FeatureMatrix {
    /// Zero-filled matrix with `rows` grid rows
    pub fn zeros(rows: usize) -> Self {
        Self {
            data: Array2::zeros((rows, FEATURE_DIMENSION)),
        }
    }

    /// Combine rasterized layer features with boundary distances
    pub fn assemble(
        grid: &[LayerFeatures],
        distances: &[BoundaryDistance],
    ) -> Result<Self, FeatureError> {
        if grid.len() != distances.len() {
            return Err(FeatureError::RowCountMismatch {
                grid: grid.len(),
                distances: distances.len(),
            });
        }

        let mut matrix = Self::zeros(grid.len());
        for (row, (features, distance)) in grid.iter().zip(distances).enumerate() {
            matrix.set(row, FeatureColumn::DistToPrev, distance.to_prev);
            matrix.set(row, FeatureColumn::DistToNext, distance.to_next);
            matrix.set(row, FeatureColumn::MudResistivity, features.mud_resistivity);
            matrix.set(row, FeatureColumn::WellDiameter, features.well_diameter);
            matrix.set(row, FeatureColumn::InvadedResistivity, features.invaded_resistivity);
            matrix.set(row, FeatureColumn::InvasionDiameter, features.invasion_diameter);
            matrix.set(row, FeatureColumn::VerticalResistivity, features.vertical_resistivity);
            matrix.set(row, FeatureColumn::HorizontalResistivity, features.horizontal_resistivity);
        }
        Ok(matrix)
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn get(&self, row: usize, column: FeatureColumn) -> f32 {
        self.data[[row, column.index()]]
    }

    pub fn set(&mut self, row: usize, column: FeatureColumn, value: f32) {
        self.data[[row, column.index()]] = value;
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    pub fn into_array(self) -> Array2<f32> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_indices_match_order() {
        for (i, column) in FEATURE_SCHEMA.iter().enumerate() {
            assert_eq!(column.index(), i, "{}", column.as_str());
        }
    }

    #[test]
    fn test_log_scaled_columns() {
        let logged: Vec<usize> = FEATURE_SCHEMA
            .iter()
            .filter(|c| c.is_log_scaled())
            .map(|c| c.index())
            .collect();
        assert_eq!(logged, vec![2, 4, 6, 7]);
    }

    #[test]
    fn test_named_access() {
        let mut matrix = FeatureMatrix::zeros(3);
        matrix.set(1, FeatureColumn::HorizontalResistivity, 4.5);
        assert_eq!(matrix.get(1, FeatureColumn::HorizontalResistivity), 4.5);
        assert_eq!(matrix.view()[[1, 7]], 4.5);
        assert_eq!(matrix.rows(), 3);
    }

    #[test]
    fn test_assemble_places_named_columns() {
        let features = LayerFeatures {
            mud_resistivity: 1.0,
            well_diameter: 2.0,
            invaded_resistivity: 3.0,
            invasion_diameter: 4.0,
            horizontal_resistivity: 5.0,
            vertical_resistivity: 6.0,
        };
        let distance = BoundaryDistance {
            to_prev: 0.25,
            to_next: 0.75,
        };
        let matrix = FeatureMatrix::assemble(&[features], &[distance]).unwrap();

        let row: Vec<f32> = matrix.view().row(0).to_vec();
        assert_eq!(row, vec![0.25, 0.75, 1.0, 2.0, 3.0, 4.0, 6.0, 5.0]);
    }

    #[test]
    fn test_assemble_row_mismatch() {
        let err = FeatureMatrix::assemble(&[LayerFeatures::default()], &[]).unwrap_err();
        assert!(matches!(err, FeatureError::RowCountMismatch { grid: 1, distances: 0 }));
    }
}
