//! Input Validation for Noise Parameters
//!
//! # Parameter Constraints
//!
//! ## Epsilon (ε)
//! - Must be finite and positive
//! - Smaller = more private, but more noise
//! - Values above [`MAX_EPSILON`] are accepted but offer little protection
//!
//! ## Delta (δ)
//! - Only used by the Gaussian mechanism
//! - Must be in (0, [`MAX_DELTA`]]
//!
//! ## Sensitivity (Δf)
//! - Must be finite and non-negative
//! - Zero is the degenerate case: the column is released without noise

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for noise parameter validation
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum DpValidationError {
    #[error("invalid epsilon {value}: {reason}")]
    InvalidEpsilon { value: f64, reason: String },
    #[error("invalid delta {value}: {reason}")]
    InvalidDelta { value: f64, reason: String },
    #[error("invalid sensitivity {value}: {reason}")]
    InvalidSensitivity { value: f64, reason: String },
}

/// Beyond this, privacy is negligible
pub const MAX_EPSILON: f64 = 10.0;

/// Too small = effectively infinite noise
pub const MIN_EPSILON: f64 = 1e-10;

/// Largest delta accepted for the Gaussian mechanism
pub const MAX_DELTA: f64 = 0.01;

/// Validate epsilon
pub fn validate_epsilon(epsilon: f64) -> Result<(), DpValidationError> {
    if !epsilon.is_finite() {
        return Err(DpValidationError::InvalidEpsilon {
            value: epsilon,
            reason: "epsilon must be a finite number".to_string(),
        });
    }

    if epsilon <= 0.0 {
        return Err(DpValidationError::InvalidEpsilon {
            value: epsilon,
            reason: "epsilon must be positive".to_string(),
        });
    }

    if epsilon < MIN_EPSILON {
        return Err(DpValidationError::InvalidEpsilon {
            value: epsilon,
            reason: format!("epsilon too small (< {}): noise would be unbounded", MIN_EPSILON),
        });
    }

    if epsilon > MAX_EPSILON {
        tracing::warn!(
            epsilon,
            max = MAX_EPSILON,
            "epsilon above recommended maximum; released values are barely protected"
        );
    }

    Ok(())
}

/// Validate delta for the Gaussian mechanism
pub fn validate_delta(delta: f64) -> Result<(), DpValidationError> {
    if !delta.is_finite() {
        return Err(DpValidationError::InvalidDelta {
            value: delta,
            reason: "delta must be a finite number".to_string(),
        });
    }

    if delta <= 0.0 {
        return Err(DpValidationError::InvalidDelta {
            value: delta,
            reason: "delta must be positive for the Gaussian mechanism".to_string(),
        });
    }

    if delta > MAX_DELTA {
        return Err(DpValidationError::InvalidDelta {
            value: delta,
            reason: format!("delta too large (> {}): guarantee too weak", MAX_DELTA),
        });
    }

    Ok(())
}

/// Validate a sensitivity, computed or caller-supplied
pub fn validate_sensitivity(sensitivity: f64) -> Result<(), DpValidationError> {
    if !sensitivity.is_finite() {
        return Err(DpValidationError::InvalidSensitivity {
            value: sensitivity,
            reason: "sensitivity must be a finite number".to_string(),
        });
    }

    if sensitivity < 0.0 {
        return Err(DpValidationError::InvalidSensitivity {
            value: sensitivity,
            reason: "sensitivity must be non-negative".to_string(),
        });
    }

    Ok(())
}
