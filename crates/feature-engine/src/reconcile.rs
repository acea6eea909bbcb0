//! Depth-Window Reconciliation
//!
//! Crops or extends paired layer sequences so they span exactly the padded
//! window around the requested depths.

use crate::error::FeatureError;
use crate::WINDOW_PADDING;
use profile_parser::{DepthArray, Layer};
use tracing::debug;

/// Padded depth range the model is run over
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthWindow {
    pub start: f64,
    pub end: f64,
}

impl DepthWindow {
    /// `[first - padding, last + padding]` around the requested depths
    pub fn around(depths: &DepthArray) -> Self {
        Self {
            start: f64::from(depths.first()) - WINDOW_PADDING,
            end: f64::from(depths.last()) + WINDOW_PADDING,
        }
    }
}

/// Layer sequences cut to the depth window
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledProfiles {
    pub horizontal: Vec<Layer>,
    pub vertical: Vec<Layer>,
    /// Top of every surviving layer plus the window end, ascending
    pub boundaries: Vec<f64>,
}

impl ReconciledProfiles {
    /// Top of the reconciled span
    pub fn top(&self) -> f64 {
        self.boundaries[0]
    }

    /// Bottom of the reconciled span
    pub fn bottom(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// Horizontal/vertical layer pairs in depth order
    pub fn pairs(&self) -> impl Iterator<Item = (&Layer, &Layer)> {
        self.horizontal.iter().zip(self.vertical.iter())
    }
}

/// Reconcile both profiles against the window
pub fn reconcile(
    horizontal: Vec<Layer>,
    vertical: Vec<Layer>,
    window: DepthWindow,
) -> Result<ReconciledProfiles, FeatureError> {
    if horizontal.len() != vertical.len() {
        return Err(FeatureError::LayerCountMismatch {
            horizontal: horizontal.len(),
            vertical: vertical.len(),
        });
    }

    let horizontal = reconcile_sequence(horizontal, window)?;
    let vertical = reconcile_sequence(vertical, window)?;

    if horizontal.len() != vertical.len() {
        return Err(FeatureError::LayerCountMismatch {
            horizontal: horizontal.len(),
            vertical: vertical.len(),
        });
    }

    let mut boundaries: Vec<f64> = horizontal.iter().map(|l| f64::from(l.top)).collect();
    boundaries.push(window.end);

    debug!(
        "Reconciled to [{}, {}]: {} layers, {} boundaries",
        window.start,
        window.end,
        horizontal.len(),
        boundaries.len()
    );

    Ok(ReconciledProfiles {
        horizontal,
        vertical,
        boundaries,
    })
}

/// Crop or extend a single layer sequence to the window
pub fn reconcile_sequence(
    mut layers: Vec<Layer>,
    window: DepthWindow,
) -> Result<Vec<Layer>, FeatureError> {
    let (Some(first), Some(last)) = (layers.first(), layers.last()) else {
        return Err(FeatureError::EmptyProfile);
    };
    let profile_top = f64::from(first.top);
    let profile_bottom = f64::from(last.bottom);

    if window.start >= profile_bottom || window.end <= profile_top {
        return Err(FeatureError::InvalidRange {
            start: window.start,
            end: window.end,
            profile_top,
            profile_bottom,
        });
    }

    // Head: layers ending at or above the window start are gone
    if window.start > profile_top {
        let keep_from = layers
            .iter()
            .position(|l| f64::from(l.bottom) > window.start)
            .unwrap_or(layers.len());
        layers.drain(..keep_from);
    }

    // Tail: layers starting at or below the window end are gone
    if window.end < profile_bottom {
        let keep_to = layers
            .iter()
            .rposition(|l| f64::from(l.top) < window.end)
            .map_or(0, |i| i + 1);
        layers.truncate(keep_to);
    }

    if layers.is_empty() {
        return Err(FeatureError::InvalidRange {
            start: window.start,
            end: window.end,
            profile_top,
            profile_bottom,
        });
    }

    let n = layers.len();
    layers[0].top = window.start as f32;
    layers[n - 1].bottom = window.end as f32;
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(top: f32, bottom: f32) -> Layer {
        Layer::new(top, bottom, vec![1.0, 0.2, 3.0, 0.4, 5.0])
    }

    fn profile(bounds: &[f32]) -> Vec<Layer> {
        bounds.windows(2).map(|w| layer(w[0], w[1])).collect()
    }

    fn window(start: f64, end: f64) -> DepthWindow {
        DepthWindow { start, end }
    }

    #[test]
    fn test_window_from_depths() {
        let depths = DepthArray::new(vec![100.0, 100.2, 100.4]).unwrap();
        let w = DepthWindow::around(&depths);
        assert_eq!(w.start, 80.0);
        assert!((w.end - 120.4).abs() < 1e-4);
    }

    #[test]
    fn test_extend_both_ends() {
        let layers = profile(&[90.0, 100.0, 110.0]);
        let out = reconcile_sequence(layers, window(80.0, 130.0)).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].top, 80.0);
        assert_eq!(out[0].bottom, 100.0);
        assert_eq!(out[1].bottom, 130.0);
    }

    #[test]
    fn test_crop_both_ends() {
        let layers = profile(&[0.0, 50.0, 85.0, 100.0, 115.0, 200.0]);
        let out = reconcile_sequence(layers, window(80.0, 120.0)).unwrap();

        let spans: Vec<(f32, f32)> = out.iter().map(|l| (l.top, l.bottom)).collect();
        assert_eq!(spans, vec![(80.0, 85.0), (85.0, 100.0), (100.0, 115.0), (115.0, 120.0)]);
    }

    #[test]
    fn test_layer_ending_at_window_start_dropped() {
        let layers = profile(&[0.0, 80.0, 100.0, 200.0]);
        let out = reconcile_sequence(layers, window(80.0, 120.0)).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].top, 80.0);
        assert_eq!(out[0].bottom, 100.0);
    }

    #[test]
    fn test_layer_starting_at_window_end_dropped() {
        let layers = profile(&[0.0, 100.0, 120.0, 200.0]);
        let out = reconcile_sequence(layers, window(80.0, 120.0)).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].top, 100.0);
        assert_eq!(out[1].bottom, 120.0);
    }

    #[test]
    fn test_no_overlap_is_invalid_range() {
        let layers = profile(&[0.0, 10.0, 20.0]);
        let err = reconcile_sequence(layers.clone(), window(30.0, 60.0)).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidRange { .. }));

        let err = reconcile_sequence(layers, window(-60.0, -5.0)).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidRange { .. }));
    }

    #[test]
    fn test_empty_profile() {
        let err = reconcile_sequence(Vec::new(), window(0.0, 1.0)).unwrap_err();
        assert!(matches!(err, FeatureError::EmptyProfile));
    }

    #[test]
    fn test_reconcile_pair_boundaries() {
        let h = profile(&[0.0, 85.0, 100.0, 200.0]);
        let v = profile(&[0.0, 85.0, 100.0, 200.0]);
        let out = reconcile(h, v, window(80.0, 120.0)).unwrap();

        assert_eq!(out.boundaries, vec![80.0, 85.0, 100.0, 120.0]);
        assert_eq!(out.top(), 80.0);
        assert_eq!(out.bottom(), 120.0);
        assert_eq!(out.pairs().count(), 3);
    }

    #[test]
    fn test_layer_count_mismatch() {
        let h = profile(&[0.0, 50.0, 100.0]);
        let v = profile(&[0.0, 100.0]);
        let err = reconcile(h, v, window(10.0, 90.0)).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::LayerCountMismatch { horizontal: 2, vertical: 1 }
        ));
    }

    #[test]
    fn test_window_inside_padded_span_hits_targets() {
        // First/last depths land exactly on the padded window for any contained window
        for (start, end) in [(5.0, 15.0), (-10.0, 30.0), (0.5, 19.5), (12.0, 40.0)] {
            let out = reconcile_sequence(profile(&[0.0, 7.0, 13.0, 20.0]), window(start, end)).unwrap();
            assert_eq!(f64::from(out[0].top), start);
            assert_eq!(f64::from(out[out.len() - 1].bottom), end);
        }
    }
}
