//! Numerical constants used throughout the tracker
//!
//! These are defaults and tolerances. Values that a caller may want to tune
//! (condition limit, covariance tolerance) are also exposed on `TrackerConfig`.

/// Default upper bound on the condition number of the innovation covariance.
///
/// Above this the 2×2 inverse is considered numerically meaningless and the
/// step degrades to predict-only.
pub const DEFAULT_MAX_CONDITION_NUMBER: f64 = 1e12;

/// Default tolerance for covariance invariant checks.
///
/// Applied relative to the largest absolute entry of the matrix (with an
/// absolute floor of the same value), for both asymmetry and negative variances.
pub const DEFAULT_COVARIANCE_TOLERANCE: f64 = 1e-9;

/// Rounding allowance for the squared Mahalanobis distance.
///
/// Distances in `[-tolerance, 0)` are rounding noise from a positive-definite
/// inverse; anything below is reported as an invariant violation.
pub const GATE_DISTANCE_TOLERANCE: f64 = 1e-9;

/// Default gating threshold on the squared Mahalanobis distance.
///
/// Chi-square 99% quantile for 2 degrees of freedom.
pub const DEFAULT_GATE_THRESHOLD: f64 = 9.21;

/// Default timestep between consecutive observations
pub const DEFAULT_TIMESTEP: f64 = 1.0;

/// Default scale of the initial covariance (`P0 = scale · I₄`)
pub const DEFAULT_INITIAL_COVARIANCE_SCALE: f64 = 1.0;

/// Default process-noise scale of the un-tuned baseline model
pub const DEFAULT_BASELINE_PROCESS_SCALE: f64 = 1.0;

/// Default measurement-noise scale of the un-tuned baseline model
pub const DEFAULT_BASELINE_MEASUREMENT_SCALE: f64 = 1.0;

/// Default process-noise candidates for the grid search
pub const DEFAULT_PROCESS_SCALES: [f64; 5] = [1e-3, 1e-2, 1e-1, 1.0, 10.0];

/// Default measurement-noise candidates for the grid search
pub const DEFAULT_MEASUREMENT_SCALES: [f64; 5] = [1e-2, 1e-1, 1.0, 10.0, 100.0];
