//! Laplace Mechanism
//!
//! For a value with sensitivity Δf, the Laplace mechanism releases
//!
//! ```text
//! M(x) = x + Lap(0, Δf/ε)
//! ```
//!
//! # Inverse CDF Sampling
//!
//! For U ~ Uniform(-0.5, 0.5):
//!
//! ```text
//! X = -b * sign(U) * ln(1 - 2|U|)  ~  Laplace(0, b)
//! ```

use super::rng::uniform_centered;
use super::validation::{validate_epsilon, validate_sensitivity, DpValidationError};
use rand::Rng;

/// Laplace mechanism for (ε, 0)-differential privacy
pub struct LaplaceMechanism;

impl LaplaceMechanism {
    /// Sample from Laplace(0, scale). Scale must be positive.
    pub fn sample<R: Rng + ?Sized>(scale: f64, rng: &mut R) -> Result<f64, DpValidationError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DpValidationError::InvalidSensitivity {
                value: scale,
                reason: "Laplace scale must be positive and finite".to_string(),
            });
        }

        let u = uniform_centered(rng);
        Ok(-scale * u.signum() * (1.0 - 2.0 * u.abs()).ln())
    }

    /// Add Laplace noise calibrated to `sensitivity / epsilon`.
    ///
    /// A sensitivity of zero returns `value` unchanged.
    pub fn add_noise<R: Rng + ?Sized>(
        value: f64,
        sensitivity: f64,
        epsilon: f64,
        rng: &mut R,
    ) -> Result<f64, DpValidationError> {
        let scale = Self::compute_scale(sensitivity, epsilon)?;
        if scale == 0.0 {
            return Ok(value);
        }
        Ok(value + Self::sample(scale, rng)?)
    }

    /// scale = Δf / ε
    pub fn compute_scale(sensitivity: f64, epsilon: f64) -> Result<f64, DpValidationError> {
        validate_sensitivity(sensitivity)?;
        validate_epsilon(epsilon)?;
        Ok(sensitivity / epsilon)
    }

    /// Var(Lap(0, b)) = 2b²
    pub fn variance(sensitivity: f64, epsilon: f64) -> Result<f64, DpValidationError> {
        let scale = Self::compute_scale(sensitivity, epsilon)?;
        Ok(2.0 * scale * scale)
    }

    /// SD = √2 · b
    pub fn std_dev(sensitivity: f64, epsilon: f64) -> Result<f64, DpValidationError> {
        Ok(Self::variance(sensitivity, epsilon)?.sqrt())
    }
}
