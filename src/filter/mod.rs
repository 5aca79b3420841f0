//! Single-target linear Kalman filtering
//!
//! - [`model`] - Constant-velocity [`MotionModel`] (F, H, Q, R)
//! - [`kalman`] - [`KalmanFilter`] predict/update on a [`GaussianState`]
//! - [`gating`] - [`GatingValidator`] chi-square validation gate
//! - [`errors`] - [`TrackingError`] and the crate `Result` alias

pub mod errors;
pub mod gating;
pub mod kalman;
pub mod model;

pub use errors::{Result, TrackingError};
pub use gating::{GateDecision, GatingValidator};
pub use kalman::{GaussianState, Innovation, KalmanFilter, UpdateOutput};
pub use model::{MotionModel, NoiseScales};
