//! Baseline versus tuned comparison
//!
//! [`analyze`] runs the un-tuned baseline model and the grid search over the
//! same input and packages both for external reporting.

use serde::Serialize;

use crate::common::metrics::{AxisErrors, ErrorSummary};
use crate::config::TrackerConfig;
use crate::filter::errors::Result;
use crate::filter::model::NoiseScales;
use crate::search::SearchResult;
use crate::tracking::input::TrackingInput;
use crate::tracking::run::{RunResult, TrackingRun};

/// Everything a reporting collaborator needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingReport {
    pub baseline_scales: NoiseScales,
    /// Run with the un-tuned model
    pub baseline: RunResult,
    /// Grid search winner and full grid
    pub search: SearchResult,
}

impl TrackingReport {
    pub fn baseline_summary(&self) -> &ErrorSummary {
        &self.baseline.summary
    }

    pub fn tuned_summary(&self) -> &ErrorSummary {
        &self.search.run.summary
    }

    pub fn baseline_axis_errors(&self) -> &AxisErrors {
        &self.baseline.axis_errors
    }

    pub fn tuned_axis_errors(&self) -> &AxisErrors {
        &self.search.run.axis_errors
    }

    /// Tuned mean error over baseline mean error
    ///
    /// Below 1 means the search helped. `None` when the baseline error is zero.
    pub fn improvement_ratio(&self) -> Option<f64> {
        let baseline = self.baseline.mean_error();
        (baseline > 0.0).then(|| self.search.min_mean_error / baseline)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Run the baseline and the grid search on `input`
///
/// # Errors
/// Validation errors from `config`, an invariant error from the baseline run,
/// or the search error when every grid cell failed.
pub fn analyze(input: &TrackingInput, config: &TrackerConfig) -> Result<TrackingReport> {
    config.validate()?;

    let baseline_model = config.baseline_model()?;
    let baseline = TrackingRun::new(baseline_model, config.run_config())?.run(input)?;
    log::info!(
        "baseline (q = {}, r = {}): mean error {:.4}, std {:.4}",
        config.baseline_process_scale,
        config.baseline_measurement_scale,
        baseline.summary.mean,
        baseline.summary.std
    );

    let search = config.search()?.run(input)?;
    log::info!(
        "tuned (q = {}, r = {}): mean error {:.4}, std {:.4}",
        search.scales.process,
        search.scales.measurement,
        search.run.summary.mean,
        search.run.summary.std
    );

    Ok(TrackingReport {
        baseline_scales: config.baseline_scales(),
        baseline,
        search,
    })
}
