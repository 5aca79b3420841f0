//! Tracker configuration
//!
//! [`TrackerConfig`] gathers every tunable of a baseline run plus grid search.
//! Missing JSON fields fall back to the defaults in
//! [`constants`](crate::common::constants).

use serde::{Deserialize, Serialize};

use crate::common::constants::{
    DEFAULT_BASELINE_MEASUREMENT_SCALE, DEFAULT_BASELINE_PROCESS_SCALE,
    DEFAULT_COVARIANCE_TOLERANCE, DEFAULT_GATE_THRESHOLD, DEFAULT_INITIAL_COVARIANCE_SCALE,
    DEFAULT_MAX_CONDITION_NUMBER, DEFAULT_MEASUREMENT_SCALES, DEFAULT_PROCESS_SCALES,
    DEFAULT_TIMESTEP,
};
use crate::filter::errors::{Result, TrackingError};
use crate::filter::model::{MotionModel, NoiseScales};
use crate::search::HyperparameterSearch;
use crate::tracking::run::RunConfig;

/// Full configuration of a baseline run and its grid search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Time between consecutive observations
    pub timestep: f64,
    /// Gate threshold on the squared Mahalanobis distance
    pub gate_threshold: f64,
    /// `P0 = initial_covariance_scale · I₄`
    pub initial_covariance_scale: f64,
    /// `q` of the un-tuned baseline model
    pub baseline_process_scale: f64,
    /// `r` of the un-tuned baseline model
    pub baseline_measurement_scale: f64,
    /// Grid search process-noise candidates (outer loop)
    pub process_scales: Vec<f64>,
    /// Grid search measurement-noise candidates (inner loop)
    pub measurement_scales: Vec<f64>,
    pub max_condition_number: f64,
    pub covariance_tolerance: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            timestep: DEFAULT_TIMESTEP,
            gate_threshold: DEFAULT_GATE_THRESHOLD,
            initial_covariance_scale: DEFAULT_INITIAL_COVARIANCE_SCALE,
            baseline_process_scale: DEFAULT_BASELINE_PROCESS_SCALE,
            baseline_measurement_scale: DEFAULT_BASELINE_MEASUREMENT_SCALE,
            process_scales: DEFAULT_PROCESS_SCALES.to_vec(),
            measurement_scales: DEFAULT_MEASUREMENT_SCALES.to_vec(),
            max_condition_number: DEFAULT_MAX_CONDITION_NUMBER,
            covariance_tolerance: DEFAULT_COVARIANCE_TOLERANCE,
        }
    }
}

impl TrackerConfig {
    /// Parse from JSON and validate
    ///
    /// # Errors
    /// [`TrackingError::Validation`] for malformed JSON or invalid values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TrackingError::validation(format!("invalid tracker config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TrackingError::validation(format!("cannot serialize tracker config: {e}")))
    }

    /// Check every value before any computation runs
    pub fn validate(&self) -> Result<()> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(TrackingError::validation(format!(
                "timestep must be positive and finite, got {}",
                self.timestep
            )));
        }
        self.run_config().validate()?;
        self.baseline_model()?;
        // Constructing the search validates both grids
        self.search()?;
        Ok(())
    }

    /// Per-run subset
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            gate_threshold: self.gate_threshold,
            initial_covariance_scale: self.initial_covariance_scale,
            max_condition_number: self.max_condition_number,
            covariance_tolerance: self.covariance_tolerance,
        }
    }

    pub fn baseline_scales(&self) -> NoiseScales {
        NoiseScales::new(self.baseline_process_scale, self.baseline_measurement_scale)
    }

    /// Un-tuned model the search is compared against
    pub fn baseline_model(&self) -> Result<MotionModel> {
        MotionModel::from_scales(
            self.baseline_process_scale,
            self.baseline_measurement_scale,
            self.timestep,
        )
    }

    pub fn search(&self) -> Result<HyperparameterSearch> {
        HyperparameterSearch::new(
            self.process_scales.clone(),
            self.measurement_scales.clone(),
            self.timestep,
            self.run_config(),
        )
    }
}
