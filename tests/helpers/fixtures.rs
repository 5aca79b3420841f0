//! Deterministic observation sequences

use gated_kalman::{simulate, Observation, ScenarioConfig, SimpleRng, TrackingInput};
use nalgebra::Vector2;

/// Straight line along x at unit speed, observations equal to truth
pub fn straight_line(n: usize) -> TrackingInput {
    TrackingInput::new((0..n).map(|t| Observation::exact(t as f64, 0.0)).collect())
        .expect("non-empty straight line")
}

/// Constant-velocity truth with observations equal to truth
pub fn exact_constant_velocity(n: usize, start: [f64; 2], velocity: [f64; 2]) -> TrackingInput {
    TrackingInput::new(
        (0..n)
            .map(|t| {
                let t = t as f64;
                Observation::exact(start[0] + velocity[0] * t, start[1] + velocity[1] * t)
            })
            .collect(),
    )
    .expect("non-empty trajectory")
}

/// `straight_line(n)` with the observation at `index` replaced by `outlier`
pub fn straight_line_with_outlier(n: usize, index: usize, outlier: [f64; 2]) -> TrackingInput {
    let observations = straight_line(n)
        .iter()
        .enumerate()
        .map(|(t, obs)| {
            if t == index {
                Observation::new(outlier.into(), obs.truth)
            } else {
                *obs
            }
        })
        .collect();
    TrackingInput::new(observations).expect("non-empty trajectory")
}

/// Seeded noisy scenario
pub fn noisy_scenario(seed: u64, num_steps: usize, measurement_std: f64) -> TrackingInput {
    let config = ScenarioConfig {
        num_steps,
        measurement_std,
        ..ScenarioConfig::default()
    };
    simulate(&config, &mut SimpleRng::new(seed)).expect("valid scenario")
}

/// Shift the observations at `indices` by `offset` away from truth
pub fn inject_outliers(input: &TrackingInput, indices: &[usize], offset: [f64; 2]) -> TrackingInput {
    let observations = input
        .iter()
        .enumerate()
        .map(|(t, obs)| {
            if indices.contains(&t) {
                Observation::new(obs.truth + Vector2::from(offset), obs.truth)
            } else {
                *obs
            }
        })
        .collect();
    TrackingInput::new(observations).expect("non-empty trajectory")
}
