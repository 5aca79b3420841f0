//! Common utilities shared by the filter, the run driver and the search.
//!
//! Fixed-size linear algebra, numerical constants, error metrics, and the
//! deterministic RNG used by the simulator.

pub mod constants;
pub mod linalg;
pub mod metrics;
pub mod rng;
