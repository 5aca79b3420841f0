/*!
# Gated Kalman - single-target tracking with noise tuning

Estimates the 2-D position of a moving object from noisy position observations
with a constant-velocity Kalman filter, rejects improbable observations with a
chi-square validation gate, and searches a grid of process/measurement noise
scales for the lowest mean error against ground truth.

## Modules

- [`filter`] - Motion model, Kalman predict/update, validation gate, errors
- [`tracking`] - Observation sequences and the per-step tracking run
- [`search`] - Exhaustive `(q, r)` grid search
- [`analysis`] - Baseline versus tuned comparison
- [`common`] - Linear algebra, constants, metrics, RNG
- [`simulation`] - Constant-velocity scenario generator

## Example

```rust
use gated_kalman::{HyperparameterSearch, MotionModel, RunConfig, TrackingInput, TrackingRun};

let input = TrackingInput::from_columns(
    &[0.0, 1.0, 2.0, 3.0],
    &[0.0, 0.0, 0.0, 0.0],
    &[0.1, 0.9, 2.1, 3.0],
    &[0.0, 0.1, -0.1, 0.0],
).unwrap();

// One run with a fixed model
let model = MotionModel::from_scales(0.1, 0.5, 1.0).unwrap();
let run = TrackingRun::new(model, RunConfig::with_gate_threshold(9.21)).unwrap();
let result = run.run(&input).unwrap();
assert_eq!(result.len(), 4);

// Tune (q, r) over a grid
let search = HyperparameterSearch::new(
    vec![0.01, 0.1, 1.0],
    vec![0.1, 1.0],
    1.0,
    RunConfig::default(),
).unwrap();
let best = search.run(&input).unwrap();
assert_eq!(best.grid.len(), 6);
println!("best q = {}, r = {}", best.scales.process, best.scales.measurement);
```
*/

// ============================================================================
// Core modules
// ============================================================================

/// Low-level utilities (linear algebra, constants, metrics, RNG)
pub mod common;

/// Single-target Kalman filtering and gating
pub mod filter;

/// Sequence-level tracking runs
pub mod tracking;

/// Noise-scale grid search
pub mod search;

/// Baseline versus tuned report
pub mod analysis;

/// Serde configuration
pub mod config;

/// Step observability hooks
pub mod reporter;

/// Scenario generation for tests, benches and demos
pub mod simulation;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// Errors
pub use filter::{Result, TrackingError};

// Filter
pub use filter::{
    GateDecision, GatingValidator, GaussianState, Innovation, KalmanFilter, MotionModel,
    NoiseScales, UpdateOutput,
};

// Tracking
pub use tracking::{
    Observation, RunConfig, RunDiagnostics, RunResult, StepOutcome, TrackingInput, TrackingRun,
};

// Search and analysis
pub use analysis::{analyze, TrackingReport};
pub use search::{CellOutcome, GridEvaluation, HyperparameterSearch, SearchResult};

// Metrics
pub use common::metrics::{AxisErrorStats, AxisErrors, ConsistencySummary, ErrorSummary};

// Configuration and observability
pub use config::TrackerConfig;
pub use reporter::{CompositeReporter, DebugReporter, LoggingReporter, NoOpReporter, StepReporter};

// Simulation
pub use common::rng::SimpleRng;
pub use simulation::{simulate, ScenarioConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
