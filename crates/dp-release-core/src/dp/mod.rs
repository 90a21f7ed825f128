//! Noise primitives
//!
//! - Laplace mechanism for (ε, 0)-DP (the default)
//! - Gaussian mechanism for (ε, δ)-DP
//! - Per-column random generators
//! - Parameter validation
//!
//! Both mechanisms treat a sensitivity of zero as "no perturbation" rather
//! than dividing into an undefined scale.

pub mod gaussian;
pub mod laplace;
pub mod rng;
pub mod validation;

pub use gaussian::GaussianMechanism;
pub use laplace::LaplaceMechanism;
pub use rng::{column_rng, NoiseRng};
pub use validation::{
    validate_delta, validate_epsilon, validate_sensitivity, DpValidationError, MAX_EPSILON,
};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which distribution noise is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseMechanism {
    /// Lap(0, Δ/ε)
    #[default]
    Laplace,
    /// N(0, σ²), σ = Δ·√(2 ln(1.25/δ))/ε
    Gaussian { delta: f64 },
}

impl NoiseMechanism {
    /// Check epsilon (and delta, where relevant)
    pub fn validate(&self, epsilon: f64) -> Result<(), DpValidationError> {
        validate_epsilon(epsilon)?;
        if let NoiseMechanism::Gaussian { delta } = self {
            validate_delta(*delta)?;
        }
        Ok(())
    }

    /// Distribution scale for a column: Laplace b or Gaussian σ.
    /// Zero when the sensitivity is zero.
    pub fn scale(&self, sensitivity: f64, epsilon: f64) -> Result<f64, DpValidationError> {
        match self {
            NoiseMechanism::Laplace => LaplaceMechanism::compute_scale(sensitivity, epsilon),
            NoiseMechanism::Gaussian { delta } => {
                GaussianMechanism::compute_sigma(sensitivity, epsilon, *delta)
            }
        }
    }

    /// One zero-centred draw at a precomputed, positive scale
    pub fn sample<R: Rng + ?Sized>(&self, scale: f64, rng: &mut R) -> Result<f64, DpValidationError> {
        match self {
            NoiseMechanism::Laplace => LaplaceMechanism::sample(scale, rng),
            NoiseMechanism::Gaussian { .. } => GaussianMechanism::sample(scale, rng),
        }
    }
}

impl fmt::Display for NoiseMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseMechanism::Laplace => write!(f, "laplace"),
            NoiseMechanism::Gaussian { delta } => write!(f, "gaussian(δ={})", delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_matches_mechanism() {
        assert_eq!(NoiseMechanism::Laplace.scale(10.0, 2.0).unwrap(), 5.0);
        let gaussian = NoiseMechanism::Gaussian { delta: 1e-5 };
        assert_eq!(
            gaussian.scale(1.0, 1.0).unwrap(),
            GaussianMechanism::compute_sigma(1.0, 1.0, 1e-5).unwrap()
        );
    }

    #[test]
    fn test_validate() {
        assert!(NoiseMechanism::Laplace.validate(1.0).is_ok());
        assert!(NoiseMechanism::Laplace.validate(0.0).is_err());
        assert!(NoiseMechanism::Gaussian { delta: 0.0 }.validate(1.0).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(NoiseMechanism::Laplace.to_string(), "laplace");
        assert_eq!(NoiseMechanism::default(), NoiseMechanism::Laplace);
    }
}
