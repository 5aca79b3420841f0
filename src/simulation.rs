//! Constant-velocity scenario generator
//!
//! Produces a [`TrackingInput`] whose truth follows a (optionally
//! acceleration-perturbed) constant-velocity trajectory and whose observations
//! add Gaussian position noise plus occasional gross outliers.

use nalgebra::Vector2;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::filter::errors::{Result, TrackingError};
use crate::tracking::input::{Observation, TrackingInput};

/// Simulated scenario parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Number of time steps
    pub num_steps: usize,
    pub timestep: f64,
    /// True `[x, y]` at step 0
    pub initial_position: [f64; 2],
    /// True `[vx, vy]` at step 0
    pub initial_velocity: [f64; 2],
    /// Std of the white acceleration perturbing the truth (0 = straight line)
    pub acceleration_std: f64,
    /// Std of the per-axis Gaussian observation noise
    pub measurement_std: f64,
    /// Probability that a step's observation is replaced by an outlier
    pub outlier_probability: f64,
    /// Distance of an outlier from the true position
    pub outlier_distance: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            num_steps: 50,
            timestep: 1.0,
            initial_position: [0.0, 0.0],
            initial_velocity: [1.0, 0.5],
            acceleration_std: 0.0,
            measurement_std: 0.5,
            outlier_probability: 0.0,
            outlier_distance: 50.0,
        }
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_steps == 0 {
            return Err(TrackingError::validation("scenario needs at least one step"));
        }
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(TrackingError::validation(format!(
                "timestep must be positive and finite, got {}",
                self.timestep
            )));
        }
        for (name, value) in [
            ("acceleration_std", self.acceleration_std),
            ("measurement_std", self.measurement_std),
            ("outlier_distance", self.outlier_distance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TrackingError::validation(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.outlier_probability) {
            return Err(TrackingError::validation(format!(
                "outlier_probability must be in [0, 1], got {}",
                self.outlier_probability
            )));
        }
        Ok(())
    }
}

/// Generate a scenario
///
/// # Errors
/// [`TrackingError::Validation`] if `config` is invalid.
pub fn simulate<R: Rng>(config: &ScenarioConfig, rng: &mut R) -> Result<TrackingInput> {
    config.validate()?;

    let acceleration = normal(config.acceleration_std)?;
    let noise = normal(config.measurement_std)?;
    let dt = config.timestep;

    let mut position = Vector2::from(config.initial_position);
    let mut velocity = Vector2::from(config.initial_velocity);
    let mut observations = Vec::with_capacity(config.num_steps);

    for t in 0..config.num_steps {
        if t > 0 {
            let a = Vector2::new(acceleration.sample(rng), acceleration.sample(rng));
            position += velocity * dt + a * (0.5 * dt * dt);
            velocity += a * dt;
        }

        let measured = if rng.gen_bool(config.outlier_probability) {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            position + Vector2::new(angle.cos(), angle.sin()) * config.outlier_distance
        } else {
            position + Vector2::new(noise.sample(rng), noise.sample(rng))
        };

        observations.push(Observation::new(measured, position));
    }

    log::debug!(
        "simulated {} steps (measurement std {}, outlier p {})",
        config.num_steps,
        config.measurement_std,
        config.outlier_probability
    );

    TrackingInput::new(observations)
}

fn normal(std: f64) -> Result<Normal<f64>> {
    Normal::new(0.0, std)
        .map_err(|e| TrackingError::validation(format!("invalid noise std {std}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::rng::SimpleRng;

    #[test]
    fn test_noise_free_straight_line() {
        let config = ScenarioConfig {
            num_steps: 5,
            initial_velocity: [2.0, -1.0],
            measurement_std: 0.0,
            ..ScenarioConfig::default()
        };
        let input = simulate(&config, &mut SimpleRng::new(1)).unwrap();

        assert_eq!(input.len(), 5);
        for (t, obs) in input.iter().enumerate() {
            let expected = Vector2::new(2.0 * t as f64, -(t as f64));
            assert!((obs.truth - expected).norm() < 1e-12);
            assert_eq!(obs.measured, obs.truth);
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let config = ScenarioConfig {
            acceleration_std: 0.1,
            outlier_probability: 0.1,
            ..ScenarioConfig::default()
        };
        let a = simulate(&config, &mut SimpleRng::new(42)).unwrap();
        let b = simulate(&config, &mut SimpleRng::new(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_outliers_at_fixed_distance() {
        let config = ScenarioConfig {
            num_steps: 20,
            outlier_probability: 1.0,
            outlier_distance: 100.0,
            ..ScenarioConfig::default()
        };
        let input = simulate(&config, &mut SimpleRng::new(5)).unwrap();

        for obs in &input {
            assert!(((obs.measured - obs.truth).norm() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_config() {
        let mut rng = SimpleRng::new(1);
        for config in [
            ScenarioConfig {
                num_steps: 0,
                ..ScenarioConfig::default()
            },
            ScenarioConfig {
                timestep: -1.0,
                ..ScenarioConfig::default()
            },
            ScenarioConfig {
                measurement_std: -0.1,
                ..ScenarioConfig::default()
            },
            ScenarioConfig {
                outlier_probability: 1.5,
                ..ScenarioConfig::default()
            },
        ] {
            assert!(simulate(&config, &mut rng).is_err());
        }
    }
}
