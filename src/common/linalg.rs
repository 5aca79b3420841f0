//! Linear algebra utilities
//!
//! Fixed-size matrix helpers for the 4-state / 2-observation filter: analytic
//! 2×2 inversion with a conditioning check, Cholesky-based 4×4 inversion,
//! symmetry enforcement and covariance invariant checks.

use nalgebra::{Matrix2, Matrix2x4, Matrix4, Matrix4x2, Vector2, Vector4};

use crate::filter::errors::{Result, TrackingError};

/// State vector `[x, vx, y, vy]`
pub type StateVector = Vector4<f64>;
/// State covariance (4×4)
pub type StateCovariance = Matrix4<f64>;
/// Observed position `[x, y]`
pub type ObservationVector = Vector2<f64>;
/// Observation-space covariance (2×2)
pub type ObservationCovariance = Matrix2<f64>;
/// Maps state to observation space (2×4)
pub type ObservationMatrix = Matrix2x4<f64>;
/// Kalman gain (4×2)
pub type GainMatrix = Matrix4x2<f64>;

/// Eigenvalues `(λ_min, λ_max)` of a symmetric 2×2 matrix.
///
/// Only the lower-left element is read for the off-diagonal; callers pass
/// symmetric matrices.
pub fn eigenvalues_2x2(m: &Matrix2<f64>) -> (f64, f64) {
    let a = m[(0, 0)];
    let b = m[(1, 0)];
    let c = m[(1, 1)];

    let half_trace = 0.5 * (a + c);
    let radius = (0.25 * (a - c) * (a - c) + b * b).sqrt();
    (half_trace - radius, half_trace + radius)
}

/// Condition number of a symmetric 2×2 matrix (ratio of absolute eigenvalues).
///
/// Returns infinity for a matrix with a zero eigenvalue.
pub fn condition_number_2x2(m: &Matrix2<f64>) -> f64 {
    let (lo, hi) = eigenvalues_2x2(m);
    let (small, large) = if lo.abs() <= hi.abs() {
        (lo.abs(), hi.abs())
    } else {
        (hi.abs(), lo.abs())
    };

    if small == 0.0 {
        f64::INFINITY
    } else {
        large / small
    }
}

/// Invert a symmetric 2×2 matrix analytically
///
/// `[[a, b], [b, c]]⁻¹ = 1/(ac − b²) · [[c, −b], [−b, a]]`
///
/// The matrix is divided by its largest absolute entry before the determinant
/// is formed, so `det` cannot overflow or underflow for well-conditioned
/// matrices of any magnitude. Singularity is judged on the scaled matrix only.
///
/// # Errors
/// [`TrackingError::SingularCovariance`] when the matrix is non-finite, zero,
/// has a zero scaled determinant, or its condition number exceeds `max_condition`.
pub fn invert_symmetric_2x2(m: &Matrix2<f64>, max_condition: f64) -> Result<Matrix2<f64>> {
    if m.iter().any(|v| !v.is_finite()) {
        return Err(TrackingError::SingularCovariance {
            context: "2x2 inverse: non-finite entries".to_string(),
            condition: f64::INFINITY,
        });
    }

    let scale = m.amax();
    if scale == 0.0 {
        return Err(TrackingError::SingularCovariance {
            context: "2x2 inverse: zero matrix".to_string(),
            condition: f64::INFINITY,
        });
    }

    let a = m[(0, 0)] / scale;
    let b = 0.5 * (m[(0, 1)] + m[(1, 0)]) / scale;
    let c = m[(1, 1)] / scale;
    let det = a * c - b * b;

    if det == 0.0 {
        return Err(TrackingError::SingularCovariance {
            context: "2x2 inverse: zero determinant".to_string(),
            condition: f64::INFINITY,
        });
    }

    let condition = condition_number_2x2(&Matrix2::new(a, b, b, c));
    if condition.is_nan() || condition > max_condition {
        return Err(TrackingError::SingularCovariance {
            context: "2x2 inverse: ill-conditioned".to_string(),
            condition,
        });
    }

    // (m / scale)⁻¹ = scale · m⁻¹
    let inv_det = 1.0 / det;
    Ok(Matrix2::new(c, -b, -b, a) * inv_det / scale)
}

/// Invert a symmetric positive-definite 4×4 matrix via Cholesky
///
/// # Errors
/// [`TrackingError::SingularCovariance`] when the matrix is not positive definite.
pub fn invert_symmetric_4x4(m: &Matrix4<f64>) -> Result<Matrix4<f64>> {
    match m.cholesky() {
        Some(chol) => Ok(chol.inverse()),
        None => Err(TrackingError::SingularCovariance {
            context: "4x4 inverse: not positive definite".to_string(),
            condition: f64::INFINITY,
        }),
    }
}

/// Squared Mahalanobis distance `yᵀ · S⁻¹ · y` given a precomputed inverse
#[inline]
pub fn mahalanobis_squared(y: &Vector2<f64>, s_inv: &Matrix2<f64>) -> f64 {
    y.dot(&(s_inv * y))
}

/// Largest absolute difference between a matrix and its transpose
pub fn asymmetry(m: &Matrix4<f64>) -> f64 {
    (m - m.transpose()).amax()
}

/// Make matrix symmetric
///
/// Ensures a matrix is symmetric by averaging with its transpose
pub fn symmetrize(m: &Matrix4<f64>) -> Matrix4<f64> {
    0.5 * (m + m.transpose())
}

/// Verify a covariance matrix is finite, symmetric and has non-negative variances.
///
/// `tolerance` is relative to the largest absolute entry (floored at 1.0, so
/// small matrices are checked absolutely).
///
/// # Errors
/// [`TrackingError::InternalInvariant`] naming `context` and the violated bound.
pub fn check_covariance(m: &Matrix4<f64>, tolerance: f64, context: &str) -> Result<()> {
    if m.iter().any(|v| !v.is_finite()) {
        return Err(TrackingError::invariant(format!(
            "{context}: covariance contains non-finite entries"
        )));
    }

    let bound = tolerance * m.amax().max(1.0);

    let skew = asymmetry(m);
    if skew > bound {
        return Err(TrackingError::invariant(format!(
            "{context}: covariance asymmetry {skew:.3e} exceeds {bound:.3e}"
        )));
    }

    for i in 0..4 {
        let variance = m[(i, i)];
        if variance < -bound {
            return Err(TrackingError::invariant(format!(
                "{context}: negative variance P[{i},{i}] = {variance:.3e}"
            )));
        }
    }

    Ok(())
}
