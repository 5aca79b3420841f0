//! Validation gate on the squared Mahalanobis distance
//!
//! `d² = yᵀ × S⁻¹ × y` is compared against a threshold; observations with
//! `d² ≤ threshold` are accepted. Under the filter's own model, `d²` of a true
//! observation is chi-square distributed with 2 degrees of freedom, so the
//! threshold is usually a chi-square quantile.

use crate::common::constants::{DEFAULT_MAX_CONDITION_NUMBER, GATE_DISTANCE_TOLERANCE};
use crate::common::linalg::{invert_symmetric_2x2, mahalanobis_squared};
use crate::filter::errors::{Result, TrackingError};
use crate::filter::kalman::Innovation;

/// Gate outcome for one time step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    /// Observation is consistent with the prediction
    Accepted {
        /// Squared Mahalanobis distance
        distance: f64,
    },
    /// Observation is too improbable to use
    Rejected {
        /// Squared Mahalanobis distance
        distance: f64,
    },
}

impl GateDecision {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateDecision::Accepted { .. })
    }

    /// The squared distance the decision was based on
    #[inline]
    pub fn distance(&self) -> f64 {
        match *self {
            GateDecision::Accepted { distance } | GateDecision::Rejected { distance } => distance,
        }
    }
}

/// Classify a squared distance against a threshold
#[inline]
pub fn classify(distance: f64, threshold: f64) -> GateDecision {
    if distance <= threshold {
        GateDecision::Accepted { distance }
    } else {
        GateDecision::Rejected { distance }
    }
}

/// Chi-square validation gate
#[derive(Debug, Clone, Copy)]
pub struct GatingValidator {
    /// Condition number above which `S` is treated as singular
    pub max_condition: f64,
}

impl Default for GatingValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONDITION_NUMBER)
    }
}

impl GatingValidator {
    pub fn new(max_condition: f64) -> Self {
        Self { max_condition }
    }

    /// Squared Mahalanobis distance of an innovation
    ///
    /// # Errors
    /// - [`TrackingError::SingularCovariance`] if `S` cannot be inverted.
    /// - [`TrackingError::InternalInvariant`] if the distance is negative beyond
    ///   rounding, which means `S` is not positive definite.
    pub fn distance(&self, innovation: &Innovation) -> Result<f64> {
        let s_inv = invert_symmetric_2x2(&innovation.covariance, self.max_condition)?;
        let distance = mahalanobis_squared(&innovation.residual, &s_inv);

        if distance.is_nan() {
            return Err(TrackingError::invariant("gating distance is NaN"));
        }

        let scale = innovation.residual.norm_squared() * s_inv.amax();
        if distance < -GATE_DISTANCE_TOLERANCE * scale.max(1.0) {
            return Err(TrackingError::invariant(format!(
                "negative gating distance {distance:.3e}: innovation covariance is not positive definite"
            )));
        }

        Ok(distance.max(0.0))
    }

    /// Accept iff `yᵀ S⁻¹ y ≤ threshold`
    pub fn validate(&self, innovation: &Innovation, threshold: f64) -> Result<GateDecision> {
        let distance = self.distance(innovation)?;
        Ok(classify(distance, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix2, Vector2};

    fn innovation(residual: Vector2<f64>, covariance: Matrix2<f64>) -> Innovation {
        Innovation {
            residual,
            covariance,
        }
    }

    #[test]
    fn test_distance() {
        let gate = GatingValidator::default();
        let inn = innovation(Vector2::new(3.0, 4.0), Matrix2::identity());
        assert!((gate.distance(&inn).unwrap() - 25.0).abs() < 1e-12);

        let inn = innovation(Vector2::new(2.0, 0.0), Matrix2::new(4.0, 0.0, 0.0, 1.0));
        assert!((gate.distance(&inn).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let gate = GatingValidator::default();
        let inn = innovation(Vector2::new(2.0, 0.0), Matrix2::identity());

        assert!(gate.validate(&inn, 4.0).unwrap().is_accepted());
        assert!(!gate.validate(&inn, 3.999).unwrap().is_accepted());
        assert_eq!(gate.validate(&inn, 3.999).unwrap().distance(), 4.0);
    }

    #[test]
    fn test_zero_residual_accepted() {
        let gate = GatingValidator::default();
        let inn = innovation(Vector2::zeros(), Matrix2::identity());
        let decision = gate.validate(&inn, 1e-6).unwrap();
        assert_eq!(decision, GateDecision::Accepted { distance: 0.0 });
    }

    #[test]
    fn test_singular_covariance() {
        let gate = GatingValidator::default();
        let inn = innovation(Vector2::new(1.0, 1.0), Matrix2::zeros());
        let err = gate.validate(&inn, 10.0).unwrap_err();
        assert!(matches!(err, TrackingError::SingularCovariance { .. }));
    }

    #[test]
    fn test_indefinite_covariance_is_invariant_error() {
        let gate = GatingValidator::default();
        // Eigenvalues 3 and -1
        let inn = innovation(Vector2::new(1.0, -1.0), Matrix2::new(1.0, 2.0, 2.0, 1.0));
        let err = gate.validate(&inn, 10.0).unwrap_err();
        assert!(matches!(err, TrackingError::InternalInvariant { .. }));
    }

    #[test]
    fn test_classify_monotone_in_threshold() {
        let thresholds = [0.0, 0.5, 1.0, 2.0, 5.0, 10.0, 100.0];
        for &d in &[0.0, 0.3, 1.0, 4.9, 50.0, 1e4] {
            let mut seen_accept = false;
            for &t in &thresholds {
                let accepted = classify(d, t).is_accepted();
                assert!(!seen_accept || accepted, "d={d}: accepted then rejected at t={t}");
                seen_accept |= accepted;
            }
        }
    }
}
