//! Observability for tracking runs.
//!
//! The [`StepReporter`] trait receives callbacks at each stage of a time step
//! (predict, gate, update or predict-only, completion) without the run driver
//! knowing who listens.
//!
//! # Overhead
//!
//! [`TrackingRun::run`](crate::TrackingRun::run) is `run_with_reporter` with a
//! [`NoOpReporter`]; its callbacks are empty and monomorphised per reporter
//! type, so a plain run carries no per-step reporting cost.
//!
//! # Example
//!
//! ```
//! use gated_kalman::{DebugReporter, MotionModel, Observation, RunConfig, TrackingInput, TrackingRun};
//!
//! let input = TrackingInput::new(vec![
//!     Observation::exact(0.0, 0.0),
//!     Observation::exact(1.0, 1.0),
//! ]).unwrap();
//! let model = MotionModel::from_scales(0.1, 0.1, 1.0).unwrap();
//! let run = TrackingRun::new(model, RunConfig::default()).unwrap();
//!
//! let mut reporter = DebugReporter::new();
//! run.run_with_reporter(&input, &mut reporter).unwrap();
//!
//! assert_eq!(reporter.prediction_events().len(), 2);
//! ```

use crate::filter::gating::GateDecision;
use crate::filter::kalman::GaussianState;
use crate::tracking::run::StepOutcome;

// ============================================================================
// StepReporter Trait
// ============================================================================

/// Observability trait for tracking step execution.
///
/// All methods have default empty implementations, so you only need
/// to override the events you care about. Callbacks receive references;
/// clone inside the callback if the data must outlive it.
pub trait StepReporter {
    /// Called after the motion model propagated the belief to step `t`.
    fn on_predict(&mut self, _t: usize, _predicted: &GaussianState) {}

    /// Called after the observation at step `t` was classified by the gate.
    ///
    /// Not called when the innovation covariance was singular.
    fn on_gate(&mut self, _t: usize, _decision: &GateDecision) {}

    /// Called after an accepted observation was fused.
    fn on_update(&mut self, _t: usize, _posterior: &GaussianState) {}

    /// Called when step `t` kept the prediction as its posterior.
    fn on_predict_only(&mut self, _t: usize, _outcome: StepOutcome) {}

    /// Called once per step with the final posterior and its position error.
    fn on_step_complete(
        &mut self,
        _t: usize,
        _outcome: StepOutcome,
        _posterior: &GaussianState,
        _error: f64,
    ) {
    }
}

// ============================================================================
// NoOpReporter
// ============================================================================

/// Zero-cost reporter that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl NoOpReporter {
    pub fn new() -> Self {
        Self
    }
}

impl StepReporter for NoOpReporter {}

// ============================================================================
// DebugReporter
// ============================================================================

/// Per-step completion record captured by [`DebugReporter`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedStep {
    pub t: usize,
    pub outcome: StepOutcome,
    pub posterior: GaussianState,
    pub error: f64,
}

/// Reporter that captures all events for debugging.
///
/// Stores clones of every state it is handed, so memory grows linearly
/// with sequence length.
#[derive(Debug, Clone, Default)]
pub struct DebugReporter {
    predictions: Vec<(usize, GaussianState)>,
    gate_decisions: Vec<(usize, GateDecision)>,
    updates: Vec<(usize, GaussianState)>,
    predict_only: Vec<(usize, StepOutcome)>,
    completed: Vec<CompletedStep>,
}

impl DebugReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all captured events.
    pub fn clear(&mut self) {
        self.predictions.clear();
        self.gate_decisions.clear();
        self.updates.clear();
        self.predict_only.clear();
        self.completed.clear();
    }

    pub fn prediction_events(&self) -> &[(usize, GaussianState)] {
        &self.predictions
    }

    pub fn gate_events(&self) -> &[(usize, GateDecision)] {
        &self.gate_decisions
    }

    pub fn update_events(&self) -> &[(usize, GaussianState)] {
        &self.updates
    }

    pub fn predict_only_events(&self) -> &[(usize, StepOutcome)] {
        &self.predict_only
    }

    pub fn completed_steps(&self) -> &[CompletedStep] {
        &self.completed
    }

    /// Predicted belief at step `t`, if captured
    pub fn prediction_at(&self, t: usize) -> Option<&GaussianState> {
        self.predictions
            .iter()
            .find(|(step, _)| *step == t)
            .map(|(_, state)| state)
    }

    /// Total number of captured events across all types.
    pub fn total_events(&self) -> usize {
        self.predictions.len()
            + self.gate_decisions.len()
            + self.updates.len()
            + self.predict_only.len()
            + self.completed.len()
    }
}

impl StepReporter for DebugReporter {
    fn on_predict(&mut self, t: usize, predicted: &GaussianState) {
        self.predictions.push((t, predicted.clone()));
    }

    fn on_gate(&mut self, t: usize, decision: &GateDecision) {
        self.gate_decisions.push((t, *decision));
    }

    fn on_update(&mut self, t: usize, posterior: &GaussianState) {
        self.updates.push((t, posterior.clone()));
    }

    fn on_predict_only(&mut self, t: usize, outcome: StepOutcome) {
        self.predict_only.push((t, outcome));
    }

    fn on_step_complete(
        &mut self,
        t: usize,
        outcome: StepOutcome,
        posterior: &GaussianState,
        error: f64,
    ) {
        self.completed.push(CompletedStep {
            t,
            outcome,
            posterior: posterior.clone(),
            error,
        });
    }
}

// ============================================================================
// LoggingReporter
// ============================================================================

/// Reporter that emits events through the `log` crate.
///
/// - `on_step_complete`: DEBUG
/// - `on_predict_only`: DEBUG
/// - `on_predict`, `on_gate`, `on_update`: TRACE (only when verbose)
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingReporter {
    verbose: bool,
}

impl LoggingReporter {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Also log the intermediate predict/gate/update stages.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl StepReporter for LoggingReporter {
    fn on_predict(&mut self, t: usize, predicted: &GaussianState) {
        if self.verbose {
            let p = predicted.position();
            log::trace!("step {t}: predicted position ({:.3}, {:.3})", p[0], p[1]);
        }
    }

    fn on_gate(&mut self, t: usize, decision: &GateDecision) {
        if self.verbose {
            log::trace!("step {t}: gate {:?}", decision);
        }
    }

    fn on_update(&mut self, t: usize, posterior: &GaussianState) {
        if self.verbose {
            let p = posterior.position();
            log::trace!("step {t}: updated position ({:.3}, {:.3})", p[0], p[1]);
        }
    }

    fn on_predict_only(&mut self, t: usize, outcome: StepOutcome) {
        log::debug!("step {t}: predict-only ({:?})", outcome);
    }

    fn on_step_complete(
        &mut self,
        t: usize,
        outcome: StepOutcome,
        _posterior: &GaussianState,
        error: f64,
    ) {
        log::debug!("step {t}: {:?}, error {:.4}", outcome, error);
    }
}

// ============================================================================
// CompositeReporter
// ============================================================================

/// Reporter that forwards events to two child reporters.
#[derive(Debug, Clone)]
pub struct CompositeReporter<A: StepReporter, B: StepReporter> {
    first: A,
    second: B,
}

impl<A: StepReporter, B: StepReporter> CompositeReporter<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    /// Consume and return both reporters.
    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: StepReporter, B: StepReporter> StepReporter for CompositeReporter<A, B> {
    fn on_predict(&mut self, t: usize, predicted: &GaussianState) {
        self.first.on_predict(t, predicted);
        self.second.on_predict(t, predicted);
    }

    fn on_gate(&mut self, t: usize, decision: &GateDecision) {
        self.first.on_gate(t, decision);
        self.second.on_gate(t, decision);
    }

    fn on_update(&mut self, t: usize, posterior: &GaussianState) {
        self.first.on_update(t, posterior);
        self.second.on_update(t, posterior);
    }

    fn on_predict_only(&mut self, t: usize, outcome: StepOutcome) {
        self.first.on_predict_only(t, outcome);
        self.second.on_predict_only(t, outcome);
    }

    fn on_step_complete(
        &mut self,
        t: usize,
        outcome: StepOutcome,
        posterior: &GaussianState,
        error: f64,
    ) {
        self.first.on_step_complete(t, outcome, posterior, error);
        self.second.on_step_complete(t, outcome, posterior, error);
    }
}

// ============================================================================
// Tests
// ============================================================================
