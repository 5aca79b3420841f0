//! Sequence-level tracking
//!
//! - [`input`] - validated observation/ground-truth sequences
//! - [`run`] - the per-step predict → gate → update driver and its result

pub mod input;
pub mod run;

pub use input::{Observation, TrackingInput};
pub use run::{RunConfig, RunDiagnostics, RunResult, StepOutcome, TrackingRun};
