//! Observation sequences
//!
//! A [`TrackingInput`] is the validated, time-ordered pairing of noisy
//! observations with ground truth. Construction is the only place input
//! validation happens; everything downstream may assume a non-empty,
//! finite sequence.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::common::linalg::{ObservationVector, StateVector};
use crate::filter::errors::{Result, TrackingError};

/// One time step: what the sensor saw and where the object really was
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Noisy observed position `[x, y]`
    pub measured: ObservationVector,
    /// True position `[x_true, y_true]`
    pub truth: ObservationVector,
}

impl Observation {
    pub fn new(measured: ObservationVector, truth: ObservationVector) -> Self {
        Self { measured, truth }
    }

    /// Observation that exactly matches the truth
    pub fn exact(x: f64, y: f64) -> Self {
        let p = Vector2::new(x, y);
        Self::new(p, p)
    }
}

/// Validated, non-empty sequence of observations in temporal order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingInput {
    observations: Vec<Observation>,
}

impl TrackingInput {
    /// Wrap an observation sequence
    ///
    /// # Errors
    /// [`TrackingError::Validation`] if the sequence is empty or contains a
    /// non-finite coordinate.
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(TrackingError::validation("observation sequence is empty"));
        }

        if let Some(t) = observations.iter().position(|o| {
            o.measured.iter().chain(o.truth.iter()).any(|v| !v.is_finite())
        }) {
            return Err(TrackingError::validation(format!(
                "observation {t} contains a non-finite coordinate"
            )));
        }

        Ok(Self { observations })
    }

    /// Build from four index-aligned coordinate sequences
    ///
    /// # Errors
    /// [`TrackingError::Validation`] if any sequence is empty or the lengths differ.
    pub fn from_columns(
        true_x: &[f64],
        true_y: &[f64],
        noisy_x: &[f64],
        noisy_y: &[f64],
    ) -> Result<Self> {
        let columns = [
            ("true_x", true_x.len()),
            ("true_y", true_y.len()),
            ("noisy_x", noisy_x.len()),
            ("noisy_y", noisy_y.len()),
        ];

        if let Some((name, _)) = columns.iter().find(|(_, len)| *len == 0) {
            return Err(TrackingError::validation(format!("{name} is empty")));
        }

        let expected = true_x.len();
        if let Some((name, len)) = columns.iter().find(|(_, len)| *len != expected) {
            return Err(TrackingError::validation(format!(
                "{name} has {len} samples, expected {expected}"
            )));
        }

        let observations = (0..expected)
            .map(|t| {
                Observation::new(
                    Vector2::new(noisy_x[t], noisy_y[t]),
                    Vector2::new(true_x[t], true_y[t]),
                )
            })
            .collect();

        Self::new(observations)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    #[inline]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// First observation (exists by construction)
    #[inline]
    pub fn first(&self) -> &Observation {
        &self.observations[0]
    }

    pub fn truth_positions(&self) -> Vec<ObservationVector> {
        self.observations.iter().map(|o| o.truth).collect()
    }

    pub fn measured_positions(&self) -> Vec<ObservationVector> {
        self.observations.iter().map(|o| o.measured).collect()
    }

    /// Reference state at step `t` for NEES
    ///
    /// Velocity is the backward difference of true positions (forward at
    /// `t = 0`, zero for a single-sample sequence).
    pub fn reference_state(&self, t: usize, dt: f64) -> StateVector {
        let p = self.observations[t].truth;
        let velocity = match (t, self.observations.len()) {
            (_, 1) => Vector2::zeros(),
            (0, _) => (self.observations[1].truth - p) / dt,
            _ => (p - self.observations[t - 1].truth) / dt,
        };
        StateVector::new(p[0], velocity[0], p[1], velocity[1])
    }
}

impl<'a> IntoIterator for &'a TrackingInput {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns() {
        let input = TrackingInput::from_columns(
            &[0.0, 1.0],
            &[0.0, 0.5],
            &[0.1, 1.2],
            &[-0.1, 0.4],
        )
        .unwrap();

        assert_eq!(input.len(), 2);
        assert_eq!(input.observations()[1].measured, Vector2::new(1.2, 0.4));
        assert_eq!(input.observations()[1].truth, Vector2::new(1.0, 0.5));
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let err = TrackingInput::from_columns(&[0.0, 1.0], &[0.0, 1.0], &[0.0], &[0.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, TrackingError::Validation { .. }));
        assert!(err.to_string().contains("noisy_x"));
    }

    #[test]
    fn test_from_columns_empty() {
        let err = TrackingInput::from_columns(&[], &[], &[], &[]).unwrap_err();
        assert!(err.to_string().contains("true_x is empty"));

        let err = TrackingInput::from_columns(&[1.0], &[1.0], &[1.0], &[]).unwrap_err();
        assert!(err.to_string().contains("noisy_y is empty"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = TrackingInput::from_columns(&[0.0, 1.0], &[0.0, 1.0], &[0.0, f64::NAN], &[0.0, 1.0])
            .unwrap_err();
        assert!(err.to_string().contains("observation 1"));
    }

    #[test]
    fn test_reference_state() {
        let input = TrackingInput::new(vec![
            Observation::exact(0.0, 0.0),
            Observation::exact(2.0, 1.0),
            Observation::exact(6.0, 1.0),
        ])
        .unwrap();

        assert_eq!(input.reference_state(0, 1.0), StateVector::new(0.0, 2.0, 0.0, 1.0));
        assert_eq!(input.reference_state(2, 2.0), StateVector::new(6.0, 2.0, 1.0, 0.0));

        let single = TrackingInput::new(vec![Observation::exact(1.0, 1.0)]).unwrap();
        assert_eq!(single.reference_state(0, 1.0), StateVector::new(1.0, 0.0, 1.0, 0.0));
    }
}
