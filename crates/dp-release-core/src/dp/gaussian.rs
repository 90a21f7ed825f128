//! Gaussian Mechanism
//!
//! (ε, δ)-differential privacy by adding N(0, σ²) noise with
//!
//! ```text
//! σ = Δf · √(2 ln(1.25/δ)) / ε
//! ```
//!
//! Standard normals come from the Box-Muller transform:
//!
//! ```text
//! Z = √(-2 ln U₁) · cos(2π U₂)
//! ```

use super::rng::uniform_pair;
use super::validation::{
    validate_delta, validate_epsilon, validate_sensitivity, DpValidationError,
};
use rand::Rng;

/// Gaussian mechanism for (ε, δ)-differential privacy
pub struct GaussianMechanism;

impl GaussianMechanism {
    /// Sample from N(0, 1)
    pub fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        let (u1, u2) = uniform_pair(rng);
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Sample from N(0, σ²). Sigma must be positive.
    pub fn sample<R: Rng + ?Sized>(sigma: f64, rng: &mut R) -> Result<f64, DpValidationError> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(DpValidationError::InvalidSensitivity {
                value: sigma,
                reason: "Gaussian sigma must be positive and finite".to_string(),
            });
        }
        Ok(Self::sample_standard_normal(rng) * sigma)
    }

    /// σ = Δf · √(2 ln(1.25/δ)) / ε
    pub fn compute_sigma(
        sensitivity: f64,
        epsilon: f64,
        delta: f64,
    ) -> Result<f64, DpValidationError> {
        validate_sensitivity(sensitivity)?;
        validate_epsilon(epsilon)?;
        validate_delta(delta)?;
        Ok(sensitivity * (2.0 * (1.25 / delta).ln()).sqrt() / epsilon)
    }

    /// Add Gaussian noise; zero sensitivity returns `value` unchanged.
    pub fn add_noise<R: Rng + ?Sized>(
        value: f64,
        sensitivity: f64,
        epsilon: f64,
        delta: f64,
        rng: &mut R,
    ) -> Result<f64, DpValidationError> {
        let sigma = Self::compute_sigma(sensitivity, epsilon, delta)?;
        if sigma == 0.0 {
            return Ok(value);
        }
        Ok(value + Self::sample(sigma, rng)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_compute_sigma() {
        // Δ=1, ε=1, δ=1e-5: √(2 ln 125000) ≈ 4.845
        let sigma = GaussianMechanism::compute_sigma(1.0, 1.0, 1e-5).unwrap();
        assert!((sigma - 4.845).abs() < 0.01, "sigma = {}", sigma);
    }

    #[test]
    fn test_compute_sigma_requires_delta() {
        assert!(GaussianMechanism::compute_sigma(1.0, 1.0, 0.0).is_err());
        assert!(GaussianMechanism::compute_sigma(1.0, 1.0, 0.2).is_err());
    }

    #[test]
    fn test_zero_sensitivity_is_identity() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let out = GaussianMechanism::add_noise(7.0, 0.0, 1.0, 1e-6, &mut rng).unwrap();
        assert_eq!(out, 7.0);
    }

    #[test]
    fn test_standard_normal_moments() {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let n = 20_000;
        let samples: Vec<f64> = (0..n)
            .map(|_| GaussianMechanism::sample_standard_normal(&mut rng))
            .collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!((variance - 1.0).abs() < 0.1, "variance {}", variance);
    }
}
