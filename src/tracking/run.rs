//! One full tracking pass over an observation sequence
//!
//! Each time step moves through `Predicted → Gated → {Updated | PredictOnly}`:
//! 1. Predict from the previous posterior
//! 2. Gate the observation on its squared Mahalanobis distance
//! 3. Accepted observations update the belief; rejected ones leave the
//!    prediction in place unchanged
//! 4. Record the estimate and its Euclidean error against truth
//!
//! A singular innovation covariance (at gating or update) degrades the step to
//! predict-only and is counted in [`RunDiagnostics`]. Invariant violations end
//! the run with an error.

use serde::{Deserialize, Serialize};

use crate::common::constants::{
    DEFAULT_COVARIANCE_TOLERANCE, DEFAULT_GATE_THRESHOLD, DEFAULT_INITIAL_COVARIANCE_SCALE,
    DEFAULT_MAX_CONDITION_NUMBER,
};
use crate::common::linalg::{
    check_covariance, invert_symmetric_4x4, ObservationVector, StateCovariance, StateVector,
};
use crate::common::metrics::{
    axis_errors, consistency, summarize, AxisErrors, ConsistencySummary, ErrorSummary,
};
use crate::filter::errors::{Result, TrackingError};
use crate::filter::gating::GatingValidator;
use crate::filter::kalman::{GaussianState, KalmanFilter};
use crate::filter::model::MotionModel;
use crate::reporter::{NoOpReporter, StepReporter};
use crate::tracking::input::TrackingInput;

/// How a time step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StepOutcome {
    /// Observation accepted by the gate and fused
    Updated,
    /// Observation rejected by the gate; posterior is the prediction
    Rejected,
    /// Innovation covariance was singular; posterior is the prediction
    SingularFallback,
}

impl StepOutcome {
    /// True when the posterior is the pure prediction
    #[inline]
    pub fn is_predict_only(&self) -> bool {
        !matches!(self, StepOutcome::Updated)
    }
}

/// Per-run counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunDiagnostics {
    /// Steps whose observation was fused
    pub accepted: usize,
    /// Steps whose observation failed the gate
    pub rejected: usize,
    /// Steps degraded to predict-only because `S` could not be inverted
    pub singular_fallbacks: usize,
}

impl RunDiagnostics {
    fn record(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Updated => self.accepted += 1,
            StepOutcome::Rejected => self.rejected += 1,
            StepOutcome::SingularFallback => self.singular_fallbacks += 1,
        }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.accepted + self.rejected + self.singular_fallbacks
    }
}

/// Numerical and gating settings of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Upper bound on the squared Mahalanobis distance of accepted observations
    pub gate_threshold: f64,
    /// `P0 = initial_covariance_scale · I₄`
    pub initial_covariance_scale: f64,
    /// Condition number above which `S` counts as singular
    pub max_condition_number: f64,
    /// Relative tolerance for covariance invariant checks
    pub covariance_tolerance: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            gate_threshold: DEFAULT_GATE_THRESHOLD,
            initial_covariance_scale: DEFAULT_INITIAL_COVARIANCE_SCALE,
            max_condition_number: DEFAULT_MAX_CONDITION_NUMBER,
            covariance_tolerance: DEFAULT_COVARIANCE_TOLERANCE,
        }
    }
}

impl RunConfig {
    /// Default numerics with the given gate threshold
    pub fn with_gate_threshold(gate_threshold: f64) -> Self {
        Self {
            gate_threshold,
            ..Self::default()
        }
    }

    /// # Errors
    /// [`TrackingError::Validation`] for a non-positive threshold, covariance
    /// scale, condition limit or tolerance.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("gate_threshold", self.gate_threshold),
            ("initial_covariance_scale", self.initial_covariance_scale),
            ("max_condition_number", self.max_condition_number),
            ("covariance_tolerance", self.covariance_tolerance),
        ];

        for (name, value) in fields {
            if value.is_nan() || value <= 0.0 {
                return Err(TrackingError::validation(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Output of one run; immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// Model the run used
    pub model: MotionModel,
    /// Posterior state per step
    pub states: Vec<StateVector>,
    /// Posterior covariance per step
    pub covariances: Vec<StateCovariance>,
    /// Estimated position per step
    pub estimates: Vec<ObservationVector>,
    /// Euclidean position error per step
    pub errors: Vec<f64>,
    /// How each step ended
    pub outcomes: Vec<StepOutcome>,
    /// Squared Mahalanobis distance per step (the NIS); `None` when `S` was singular
    pub gate_distances: Vec<Option<f64>>,
    /// Posterior NEES against the truth reference state; `None` if `P` is not invertible
    pub nees: Vec<Option<f64>>,
    /// Position error summary
    pub summary: ErrorSummary,
    /// Signed per-axis error
    pub axis_errors: AxisErrors,
    /// Average NIS/NEES
    pub consistency: ConsistencySummary,
    /// Step outcome counters
    pub diagnostics: RunDiagnostics,
}

impl RunResult {
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Mean position error, the quantity the grid search minimises
    #[inline]
    pub fn mean_error(&self) -> f64 {
        self.summary.mean
    }
}

/// Driver for one pass of predict → gate → update over a sequence
#[derive(Debug, Clone)]
pub struct TrackingRun {
    model: MotionModel,
    config: RunConfig,
    filter: KalmanFilter,
    gate: GatingValidator,
}

impl TrackingRun {
    /// # Errors
    /// [`TrackingError::Validation`] if `config` is invalid.
    pub fn new(model: MotionModel, config: RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            model,
            config,
            filter: KalmanFilter::new(config.max_condition_number, config.covariance_tolerance),
            gate: GatingValidator::new(config.max_condition_number),
        })
    }

    #[inline]
    pub fn model(&self) -> &MotionModel {
        &self.model
    }

    #[inline]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run over the whole sequence
    pub fn run(&self, input: &TrackingInput) -> Result<RunResult> {
        self.run_with_reporter(input, &mut NoOpReporter)
    }

    /// Run over the whole sequence, reporting each stage to `reporter`
    ///
    /// # Errors
    /// [`TrackingError::InternalInvariant`] if a covariance or gate distance
    /// breaks its invariant. Singular innovation covariances do not error.
    pub fn run_with_reporter<R: StepReporter>(
        &self,
        input: &TrackingInput,
        reporter: &mut R,
    ) -> Result<RunResult> {
        let n = input.len();
        let tolerance = self.config.covariance_tolerance;

        let mut belief = GaussianState::from_first_observation(
            &input.first().measured,
            self.config.initial_covariance_scale,
        );

        let mut states = Vec::with_capacity(n);
        let mut covariances = Vec::with_capacity(n);
        let mut estimates = Vec::with_capacity(n);
        let mut errors = Vec::with_capacity(n);
        let mut outcomes = Vec::with_capacity(n);
        let mut gate_distances = Vec::with_capacity(n);
        let mut nees = Vec::with_capacity(n);
        let mut diagnostics = RunDiagnostics::default();

        for (t, observation) in input.iter().enumerate() {
            let predicted = self.filter.predict(&belief, &self.model);
            check_covariance(&predicted.covariance, tolerance, "predicted covariance")
                .map_err(|e| at_step(e, t))?;
            reporter.on_predict(t, &predicted);

            let innovation = self.filter.innovation(&predicted, &observation.measured, &self.model);

            let (posterior, outcome, distance) =
                match self.gate.validate(&innovation, self.config.gate_threshold) {
                    Ok(decision) => {
                        reporter.on_gate(t, &decision);
                        let distance = Some(decision.distance());

                        if !decision.is_accepted() {
                            log::trace!("step {t}: rejected (d² = {:.3})", decision.distance());
                            (predicted, StepOutcome::Rejected, distance)
                        } else {
                            match self.filter.update(&predicted, &observation.measured, &self.model) {
                                Ok(out) => {
                                    reporter.on_update(t, &out.posterior);
                                    (out.posterior, StepOutcome::Updated, distance)
                                }
                                Err(e) if e.is_recoverable() => {
                                    log::debug!("step {t}: update fell back to prediction: {e}");
                                    (predicted, StepOutcome::SingularFallback, distance)
                                }
                                Err(e) => return Err(at_step(e, t)),
                            }
                        }
                    }
                    Err(e) if e.is_recoverable() => {
                        log::debug!("step {t}: gate fell back to prediction: {e}");
                        (predicted, StepOutcome::SingularFallback, None)
                    }
                    Err(e) => return Err(at_step(e, t)),
                };

            if outcome.is_predict_only() {
                reporter.on_predict_only(t, outcome);
            }
            diagnostics.record(outcome);

            let estimate = posterior.position();
            let error = (estimate - observation.truth).norm();

            let reference = input.reference_state(t, self.model.dt);
            let step_nees = invert_symmetric_4x4(&posterior.covariance).ok().map(|p_inv| {
                let e = posterior.mean - reference;
                e.dot(&(p_inv * e))
            });

            reporter.on_step_complete(t, outcome, &posterior, error);

            states.push(posterior.mean);
            covariances.push(posterior.covariance);
            estimates.push(estimate);
            errors.push(error);
            outcomes.push(outcome);
            gate_distances.push(distance);
            nees.push(step_nees);

            belief = posterior;
        }

        let truths = input.truth_positions();
        let summary = summarize(&errors);

        log::debug!(
            "run complete: {} steps, mean error {:.4}, accepted {}, rejected {}, singular {}",
            n,
            summary.mean,
            diagnostics.accepted,
            diagnostics.rejected,
            diagnostics.singular_fallbacks
        );

        Ok(RunResult {
            model: self.model.clone(),
            axis_errors: axis_errors(&estimates, &truths),
            consistency: consistency(&gate_distances, &nees),
            states,
            covariances,
            estimates,
            errors,
            outcomes,
            gate_distances,
            nees,
            summary,
            diagnostics,
        })
    }
}

/// Prefix invariant errors with the step they happened at
fn at_step(error: TrackingError, t: usize) -> TrackingError {
    match error {
        TrackingError::InternalInvariant { description } => TrackingError::InternalInvariant {
            description: format!("step {t}: {description}"),
        },
        other => other,
    }
}
