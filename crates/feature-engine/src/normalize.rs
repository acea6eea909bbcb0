//! Feature Normalization

use crate::error::FeatureError;
use crate::schema::{FeatureColumn, FeatureMatrix, FEATURE_SCHEMA};
use crate::NO_INVASION;
use tracing::debug;

/// Log-scale resistivity columns and mark rows without an invasion diameter.
///
/// Fails on the first non-positive (or non-finite) value in a log-scaled column
/// instead of producing NaN.
pub fn normalize(matrix: &mut FeatureMatrix) -> Result<(), FeatureError> {
    let logged: Vec<FeatureColumn> = FEATURE_SCHEMA
        .iter()
        .copied()
        .filter(|c| c.is_log_scaled())
        .collect();

    let mut missing_invasion = 0usize;
    for row in 0..matrix.rows() {
        if matrix.get(row, FeatureColumn::InvasionDiameter) == 0.0 {
            matrix.set(row, FeatureColumn::InvasionDiameter, NO_INVASION);
            missing_invasion += 1;
        }

        for &column in &logged {
            let value = matrix.get(row, column);
            if !(value > 0.0 && value.is_finite()) {
                return Err(FeatureError::Domain {
                    column: column.as_str(),
                    row,
                    value,
                });
            }
            matrix.set(row, column, value.ln());
        }
    }

    debug!(
        "Normalized {} rows ({} without invasion diameter)",
        matrix.rows(),
        missing_invasion
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryDistance;
    use crate::raster::LayerFeatures;

    fn matrix(features: LayerFeatures) -> FeatureMatrix {
        let distance = BoundaryDistance {
            to_prev: 0.0,
            to_next: -1.0,
        };
        FeatureMatrix::assemble(&[features], &[distance]).unwrap()
    }

    fn features() -> LayerFeatures {
        LayerFeatures {
            mud_resistivity: 0.5,
            well_diameter: 0.216,
            invaded_resistivity: std::f32::consts::E,
            invasion_diameter: 0.0,
            horizontal_resistivity: 1.0,
            vertical_resistivity: 10.0,
        }
    }

    #[test]
    fn test_log_columns_and_invasion_marker() {
        let mut m = matrix(features());
        normalize(&mut m).unwrap();

        assert!((m.get(0, FeatureColumn::MudResistivity) - 0.5f32.ln()).abs() < 1e-6);
        assert!((m.get(0, FeatureColumn::InvadedResistivity) - 1.0).abs() < 1e-6);
        assert_eq!(m.get(0, FeatureColumn::HorizontalResistivity), 0.0);
        assert!((m.get(0, FeatureColumn::VerticalResistivity) - 10f32.ln()).abs() < 1e-6);
        assert_eq!(m.get(0, FeatureColumn::InvasionDiameter), -1.0);

        // Untouched
        assert_eq!(m.get(0, FeatureColumn::WellDiameter), 0.216);
        assert_eq!(m.get(0, FeatureColumn::DistToNext), -1.0);
    }

    #[test]
    fn test_present_invasion_kept() {
        let mut m = matrix(LayerFeatures {
            invasion_diameter: 0.8,
            ..features()
        });
        normalize(&mut m).unwrap();
        assert_eq!(m.get(0, FeatureColumn::InvasionDiameter), 0.8);
    }

    #[test]
    fn test_non_positive_resistivity_is_domain_error() {
        let mut m = matrix(LayerFeatures {
            vertical_resistivity: 0.0,
            ..features()
        });
        let err = normalize(&mut m).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::Domain {
                column: "vertical_resistivity",
                row: 0,
                ..
            }
        ));
    }
}
