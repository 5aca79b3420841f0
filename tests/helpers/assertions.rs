//! Numerical comparisons with tolerance
//!
//! Every helper panics through [`mismatch`] so failures read the same whether
//! they come from a scalar, a position or a covariance entry.

use nalgebra::{Matrix4, Vector2};

/// Uniform failure message: what was compared, both values and the gap
fn mismatch(
    field: &str,
    expected: impl std::fmt::Debug,
    actual: impl std::fmt::Debug,
    gap: f64,
    tolerance: f64,
) -> String {
    format!("{field}: expected {expected:?}, got {actual:?} (gap {gap:e} > tolerance {tolerance:e})")
}

/// `|actual - expected| <= tolerance`
pub fn assert_scalar_close(actual: f64, expected: f64, tolerance: f64, field: &str) {
    let gap = (actual - expected).abs();
    // NaN gaps must fail too
    if !(gap <= tolerance) {
        panic!("{}", mismatch(field, expected, actual, gap, tolerance));
    }
}

/// Element-wise [`assert_scalar_close`] after a length check
pub fn assert_vec_close(actual: &[f64], expected: &[f64], tolerance: f64, field: &str) {
    assert_eq!(actual.len(), expected.len(), "{field}: length mismatch");
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        assert_scalar_close(a, e, tolerance, &format!("{field}[{i}]"));
    }
}

/// Euclidean distance between two positions within `tolerance`
pub fn assert_position_close(
    actual: &Vector2<f64>,
    expected: &Vector2<f64>,
    tolerance: f64,
    field: &str,
) {
    let gap = (actual - expected).norm();
    if !(gap <= tolerance) {
        panic!(
            "{}",
            mismatch(field, (expected.x, expected.y), (actual.x, actual.y), gap, tolerance)
        );
    }
}

/// Symmetric with non-negative diagonal
pub fn assert_valid_covariance(p: &Matrix4<f64>, tolerance: f64, field: &str) {
    for i in 0..4 {
        let variance = p[(i, i)];
        if variance < -tolerance {
            panic!(
                "{}",
                mismatch(&format!("{field} variance [{i}]"), ">= 0", variance, -variance, tolerance)
            );
        }
        for j in (i + 1)..4 {
            let label = format!("{field} symmetry ({i}, {j})");
            assert_scalar_close(p[(i, j)], p[(j, i)], tolerance, &label);
        }
    }
}
