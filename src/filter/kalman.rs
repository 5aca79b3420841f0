//! Linear Kalman filter core
//!
//! Implements the two halves of the recursion for the constant-velocity model:
//! - Prediction: `x' = F·x`, `P' = F·P·Fᵀ + Q`
//! - Update: `K = P'·Hᵀ·S⁻¹`, `x = x' + K·y`, `P = (I − K·H)·P'`
//!
//! The update enforces symmetry of the posterior covariance, after first
//! checking that the asymmetry introduced by the arithmetic is within tolerance.

use serde::Serialize;

use crate::common::constants::{DEFAULT_COVARIANCE_TOLERANCE, DEFAULT_MAX_CONDITION_NUMBER};
use crate::common::linalg::{
    check_covariance, invert_symmetric_2x2, symmetrize, GainMatrix, ObservationCovariance,
    ObservationVector, StateCovariance, StateVector,
};
use crate::filter::errors::Result;
use crate::filter::model::MotionModel;

/// Gaussian belief over the state `[x, vx, y, vy]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaussianState {
    /// State mean
    pub mean: StateVector,
    /// State covariance
    pub covariance: StateCovariance,
}

impl GaussianState {
    pub fn new(mean: StateVector, covariance: StateCovariance) -> Self {
        Self { mean, covariance }
    }

    /// Initial belief: position from the first observation, zero velocity,
    /// covariance `scale · I₄`
    pub fn from_first_observation(z: &ObservationVector, covariance_scale: f64) -> Self {
        Self {
            mean: StateVector::new(z[0], 0.0, z[1], 0.0),
            covariance: StateCovariance::identity() * covariance_scale,
        }
    }

    /// Estimated position `[x, y]`
    #[inline]
    pub fn position(&self) -> ObservationVector {
        ObservationVector::new(self.mean[0], self.mean[2])
    }

    /// Estimated velocity `[vx, vy]`
    #[inline]
    pub fn velocity(&self) -> ObservationVector {
        ObservationVector::new(self.mean[1], self.mean[3])
    }
}

/// Measurement residual and its covariance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Innovation {
    /// `y = z − H·x'`
    pub residual: ObservationVector,
    /// `S = H·P'·Hᵀ + R`
    pub covariance: ObservationCovariance,
}

/// Result of a successful measurement update
#[derive(Debug, Clone)]
pub struct UpdateOutput {
    /// Posterior belief
    pub posterior: GaussianState,
    /// Innovation the update was computed from
    pub innovation: Innovation,
    /// Kalman gain used
    pub gain: GainMatrix,
}

/// Kalman filter for a [`MotionModel`]
///
/// Holds only numerical limits; the state belongs to the caller so that each
/// run owns an isolated copy.
#[derive(Debug, Clone, Copy)]
pub struct KalmanFilter {
    /// Condition number above which `S` is treated as singular
    pub max_condition: f64,
    /// Relative tolerance for covariance invariant checks
    pub covariance_tolerance: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONDITION_NUMBER, DEFAULT_COVARIANCE_TOLERANCE)
    }
}

impl KalmanFilter {
    pub fn new(max_condition: f64, covariance_tolerance: f64) -> Self {
        Self {
            max_condition,
            covariance_tolerance,
        }
    }

    /// Propagate a belief one timestep forward
    ///
    /// - `x' = F × x`
    /// - `P' = F × P × Fᵀ + Q`
    #[inline]
    pub fn predict(&self, state: &GaussianState, model: &MotionModel) -> GaussianState {
        let f = &model.transition_matrix;
        GaussianState {
            mean: f * state.mean,
            covariance: f * state.covariance * f.transpose() + model.process_noise,
        }
    }

    /// Innovation of observation `z` against a predicted belief
    #[inline]
    pub fn innovation(
        &self,
        predicted: &GaussianState,
        z: &ObservationVector,
        model: &MotionModel,
    ) -> Innovation {
        let h = &model.observation_matrix;
        Innovation {
            residual: z - h * predicted.mean,
            covariance: h * predicted.covariance * h.transpose() + model.measurement_noise,
        }
    }

    /// Condition a predicted belief on observation `z`
    ///
    /// # Errors
    /// - [`SingularCovariance`](crate::TrackingError::SingularCovariance) if `S`
    ///   cannot be inverted; the caller keeps the prediction.
    /// - [`InternalInvariant`](crate::TrackingError::InternalInvariant) if the
    ///   posterior covariance is asymmetric or has a negative variance.
    pub fn update(
        &self,
        predicted: &GaussianState,
        z: &ObservationVector,
        model: &MotionModel,
    ) -> Result<UpdateOutput> {
        let innovation = self.innovation(predicted, z, model);
        let s_inv = invert_symmetric_2x2(&innovation.covariance, self.max_condition)?;

        let h = &model.observation_matrix;
        let gain: GainMatrix = predicted.covariance * h.transpose() * s_inv;

        let mean = predicted.mean + gain * innovation.residual;
        let covariance = (StateCovariance::identity() - gain * h) * predicted.covariance;

        check_covariance(&covariance, self.covariance_tolerance, "posterior covariance")?;

        Ok(UpdateOutput {
            posterior: GaussianState::new(mean, symmetrize(&covariance)),
            innovation,
            gain,
        })
    }
}
