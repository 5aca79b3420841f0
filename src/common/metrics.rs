//! Performance metrics for tracking evaluation
//!
//! Summaries of per-step position error (mean, population standard deviation,
//! RMSE), signed per-axis error for directional bias, and filter consistency
//! (average NIS and NEES). All functions are pure.

use nalgebra::Vector2;
use serde::Serialize;

/// Summary of a sequence of non-negative position errors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ErrorSummary {
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Root mean square
    pub rmse: f64,
    /// Largest error
    pub max: f64,
}

/// Mean and standard deviation of a signed error along one axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisErrorStats {
    pub mean: f64,
    pub std: f64,
}

/// Signed error statistics (estimate − truth) per axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisErrors {
    pub x: AxisErrorStats,
    pub y: AxisErrorStats,
}

/// Filter consistency averages
///
/// For a consistent filter the mean NIS is close to 2 (observation dimension)
/// and the mean NEES close to 4 (state dimension).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ConsistencySummary {
    /// Mean normalized innovation squared over steps where it was defined
    pub mean_nis: f64,
    /// Number of NIS samples
    pub nis_samples: usize,
    /// Mean normalized estimation error squared over steps where it was defined
    pub mean_nees: f64,
    /// Number of NEES samples
    pub nees_samples: usize,
}

/// Mean and population standard deviation. Empty input gives `(0, 0)`.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Summarize per-step position errors
///
/// Empty input gives an all-zero summary.
pub fn summarize(errors: &[f64]) -> ErrorSummary {
    if errors.is_empty() {
        return ErrorSummary::default();
    }

    let (mean, std) = mean_std(errors);
    let mean_square = errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64;
    let max = errors.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    ErrorSummary {
        mean,
        std,
        rmse: mean_square.sqrt(),
        max,
    }
}

/// Euclidean distance between each estimate and its truth
pub fn position_errors(estimates: &[Vector2<f64>], truths: &[Vector2<f64>]) -> Vec<f64> {
    estimates
        .iter()
        .zip(truths)
        .map(|(est, truth)| (est - truth).norm())
        .collect()
}

/// Signed per-axis error statistics
///
/// Pairs beyond the shorter of the two slices are ignored.
pub fn axis_errors(estimates: &[Vector2<f64>], truths: &[Vector2<f64>]) -> AxisErrors {
    let (dx, dy): (Vec<f64>, Vec<f64>) = estimates
        .iter()
        .zip(truths)
        .map(|(est, truth)| (est[0] - truth[0], est[1] - truth[1]))
        .unzip();

    let (x_mean, x_std) = mean_std(&dx);
    let (y_mean, y_std) = mean_std(&dy);

    AxisErrors {
        x: AxisErrorStats {
            mean: x_mean,
            std: x_std,
        },
        y: AxisErrorStats {
            mean: y_mean,
            std: y_std,
        },
    }
}

/// Average the defined NIS and NEES samples
pub fn consistency(nis: &[Option<f64>], nees: &[Option<f64>]) -> ConsistencySummary {
    let nis: Vec<f64> = nis.iter().flatten().copied().collect();
    let nees: Vec<f64> = nees.iter().flatten().copied().collect();

    ConsistencySummary {
        mean_nis: mean_std(&nis).0,
        nis_samples: nis.len(),
        mean_nees: mean_std(&nees).0,
        nees_samples: nees.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), ErrorSummary::default());
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[1.0, 2.0, 3.0, 4.0]);
        assert!((summary.mean - 2.5).abs() < 1e-12);
        // Population variance: (2.25 + 0.25 + 0.25 + 2.25) / 4 = 1.25
        assert!((summary.std - 1.25_f64.sqrt()).abs() < 1e-12);
        assert!((summary.rmse - 7.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary.max, 4.0);
    }

    #[test]
    fn test_summarize_constant() {
        let summary = summarize(&[0.5; 10]);
        assert!((summary.mean - 0.5).abs() < 1e-12);
        assert!(summary.std.abs() < 1e-12);
        assert!((summary.rmse - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_position_errors() {
        let est = vec![Vector2::new(3.0, 4.0), Vector2::new(1.0, 1.0)];
        let truth = vec![Vector2::zeros(), Vector2::new(1.0, 1.0)];
        assert_eq!(position_errors(&est, &truth), vec![5.0, 0.0]);
    }

    #[test]
    fn test_axis_errors_capture_bias() {
        let est = vec![
            Vector2::new(1.0, -1.0),
            Vector2::new(2.0, -1.0),
            Vector2::new(3.0, -1.0),
        ];
        let truth = vec![Vector2::zeros(), Vector2::zeros(), Vector2::zeros()];

        let axes = axis_errors(&est, &truth);

        assert!((axes.x.mean - 2.0).abs() < 1e-12);
        assert!((axes.x.std - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((axes.y.mean + 1.0).abs() < 1e-12);
        assert!(axes.y.std.abs() < 1e-12);
    }

    #[test]
    fn test_consistency_skips_undefined() {
        let summary = consistency(&[Some(1.0), None, Some(3.0)], &[None, Some(4.0)]);
        assert_eq!(summary.nis_samples, 2);
        assert!((summary.mean_nis - 2.0).abs() < 1e-12);
        assert_eq!(summary.nees_samples, 1);
        assert!((summary.mean_nees - 4.0).abs() < 1e-12);
    }
}
