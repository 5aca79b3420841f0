//! Constant-velocity motion model
//!
//! State ordering is `[x, vx, y, vy]`; the sensor observes `[x, y]`.

use nalgebra::{DMatrix, Matrix2};
use serde::Serialize;

use crate::common::constants::DEFAULT_COVARIANCE_TOLERANCE;
use crate::common::linalg::{
    ObservationCovariance, ObservationMatrix, StateCovariance, StateVector,
};
use crate::filter::errors::{Result, TrackingError};

/// Process/measurement noise scales of a scaled-identity model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoiseScales {
    /// `q` in `Q = q · I₄`
    pub process: f64,
    /// `r` in `R = r · I₂`
    pub measurement: f64,
}

impl NoiseScales {
    pub fn new(process: f64, measurement: f64) -> Self {
        Self {
            process,
            measurement,
        }
    }
}

/// Immutable linear-Gaussian model for one tracking run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionModel {
    /// Timestep between observations
    pub dt: f64,
    /// State transition matrix (F)
    pub transition_matrix: StateCovariance,
    /// Observation matrix (H)
    pub observation_matrix: ObservationMatrix,
    /// Process noise covariance (Q)
    pub process_noise: StateCovariance,
    /// Measurement noise covariance (R)
    pub measurement_noise: ObservationCovariance,
}

impl MotionModel {
    /// Create a model from explicit noise covariances
    ///
    /// # Errors
    /// [`TrackingError::Validation`] if `dt` is not a positive finite number,
    /// or if `Q` or `R` is not a finite symmetric positive semi-definite matrix.
    pub fn new(
        dt: f64,
        process_noise: StateCovariance,
        measurement_noise: ObservationCovariance,
    ) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(TrackingError::validation(format!(
                "timestep must be positive and finite, got {dt}"
            )));
        }
        validate_noise(
            "process noise",
            DMatrix::from_column_slice(4, 4, process_noise.as_slice()),
        )?;
        validate_noise(
            "measurement noise",
            DMatrix::from_column_slice(2, 2, measurement_noise.as_slice()),
        )?;

        Ok(Self {
            dt,
            transition_matrix: Self::constant_velocity_transition(dt),
            observation_matrix: Self::position_observation(),
            process_noise,
            measurement_noise,
        })
    }

    /// Scaled-identity noise model: `Q = q · I₄`, `R = r · I₂`
    ///
    /// # Errors
    /// [`TrackingError::Validation`] for a non-positive timestep or scale.
    pub fn from_scales(q: f64, r: f64, dt: f64) -> Result<Self> {
        if !(q.is_finite() && q > 0.0) {
            return Err(TrackingError::validation(format!(
                "process noise scale must be positive, got {q}"
            )));
        }
        if !(r.is_finite() && r > 0.0) {
            return Err(TrackingError::validation(format!(
                "measurement noise scale must be positive, got {r}"
            )));
        }

        Self::new(
            dt,
            StateCovariance::identity() * q,
            ObservationCovariance::identity() * r,
        )
    }

    /// Discretised continuous white-noise-acceleration model
    ///
    /// Per axis the process noise block is
    /// `σa² · [[dt³/3, dt²/2], [dt²/2, dt]]`, and `R = σz² · I₂`.
    pub fn white_noise_acceleration(dt: f64, sigma_a: f64, sigma_z: f64) -> Result<Self> {
        let q = sigma_a * sigma_a;
        let dt2 = dt * dt;
        let dt3 = dt2 * dt;

        #[rustfmt::skip]
        let process_noise = StateCovariance::new(
            q * dt3 / 3.0, q * dt2 / 2.0, 0.0,           0.0,
            q * dt2 / 2.0, q * dt,        0.0,           0.0,
            0.0,           0.0,           q * dt3 / 3.0, q * dt2 / 2.0,
            0.0,           0.0,           q * dt2 / 2.0, q * dt,
        );

        Self::new(dt, process_noise, Matrix2::identity() * (sigma_z * sigma_z))
    }

    /// `F` for state `[x, vx, y, vy]`: position advances by `dt · velocity`
    pub fn constant_velocity_transition(dt: f64) -> StateCovariance {
        #[rustfmt::skip]
        let f = StateCovariance::new(
            1.0, dt,  0.0, 0.0,   // x' = x + dt*vx
            0.0, 1.0, 0.0, 0.0,   // vx' = vx
            0.0, 0.0, 1.0, dt,    // y' = y + dt*vy
            0.0, 0.0, 0.0, 1.0,   // vy' = vy
        );
        f
    }

    /// `H` selecting `[x, y]` out of `[x, vx, y, vy]`
    pub fn position_observation() -> ObservationMatrix {
        #[rustfmt::skip]
        let h = ObservationMatrix::new(
            1.0, 0.0, 0.0, 0.0,   // z[0] = x
            0.0, 0.0, 1.0, 0.0,   // z[1] = y
        );
        h
    }

    /// Position part of a state vector
    #[inline]
    pub fn observe(&self, state: &StateVector) -> nalgebra::Vector2<f64> {
        self.observation_matrix * state
    }
}

/// Finite, symmetric and positive semi-definite, within the default relative tolerance
fn validate_noise(name: &str, m: DMatrix<f64>) -> Result<()> {
    if m.iter().any(|v| !v.is_finite()) {
        return Err(TrackingError::validation(format!(
            "{name} covariance contains non-finite entries"
        )));
    }

    let bound = DEFAULT_COVARIANCE_TOLERANCE * m.amax().max(1.0);
    let skew = (&m - m.transpose()).amax();
    if skew > bound {
        return Err(TrackingError::validation(format!(
            "{name} covariance is not symmetric (asymmetry {skew:.3e})"
        )));
    }

    let min_eigenvalue = m.symmetric_eigenvalues().min();
    if min_eigenvalue < -bound {
        return Err(TrackingError::validation(format!(
            "{name} covariance is not positive semi-definite (eigenvalue {min_eigenvalue:.3e})"
        )));
    }
    Ok(())
}
