//! Error types for tracking runs and hyperparameter search
//!
//! Three failure classes exist, each with its own propagation policy:
//! - [`TrackingError::Validation`] aborts before any computation starts
//! - [`TrackingError::SingularCovariance`] is recovered inside a run (predict-only step)
//! - [`TrackingError::InternalInvariant`] aborts the run that raised it

use thiserror::Error;

/// Errors raised by the estimator, the gate, and the drivers above them
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackingError {
    /// Malformed input sequences or configuration
    #[error("Validation failed: {description}")]
    Validation {
        /// What was wrong with the input
        description: String,
    },

    /// A covariance matrix could not be inverted
    #[error("Singular covariance ({context}): condition number {condition:.3e}")]
    SingularCovariance {
        /// Which matrix failed (e.g. "innovation covariance")
        context: String,
        /// Condition number at the time of failure (infinite for exact singularity)
        condition: f64,
    },

    /// Arithmetic produced a result that violates a filter invariant
    #[error("Internal invariant violated: {description}")]
    InternalInvariant {
        /// Which invariant broke and by how much
        description: String,
    },
}

impl TrackingError {
    pub(crate) fn validation(description: impl Into<String>) -> Self {
        TrackingError::Validation {
            description: description.into(),
        }
    }

    pub(crate) fn invariant(description: impl Into<String>) -> Self {
        TrackingError::InternalInvariant {
            description: description.into(),
        }
    }

    /// True for errors a run recovers from by degrading to predict-only
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TrackingError::SingularCovariance { .. })
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, TrackingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackingError::SingularCovariance {
            context: "innovation covariance".to_string(),
            condition: f64::INFINITY,
        };
        assert!(err.to_string().contains("innovation covariance"));

        let err = TrackingError::validation("noisy_x has 3 samples, expected 4");
        assert!(err.to_string().contains("noisy_x"));
        assert!(err.to_string().starts_with("Validation failed"));
    }

    #[test]
    fn test_recoverable() {
        let singular = TrackingError::SingularCovariance {
            context: "S".to_string(),
            condition: 1e20,
        };
        assert!(singular.is_recoverable());
        assert!(!TrackingError::invariant("P[0,0] = -1").is_recoverable());
        assert!(!TrackingError::validation("empty").is_recoverable());
    }
}
