//! Noise Injection
//!
//! Perturbs numeric cells one at a time with zero-centred noise whose scale is
//! derived from a column's [`Sensitivity`] and the release epsilon. Output is
//! neither clamped nor rounded.

use crate::dp::{DpValidationError, NoiseMechanism};
use crate::sensitivity::Sensitivity;
use crate::table::Value;
use rand::Rng;

/// Applies one mechanism at one epsilon
#[derive(Debug, Clone, Copy)]
pub struct NoiseInjector {
    mechanism: NoiseMechanism,
    epsilon: f64,
}

impl NoiseInjector {
    /// Create an injector, validating the parameters up front
    pub fn new(mechanism: NoiseMechanism, epsilon: f64) -> Result<Self, DpValidationError> {
        mechanism.validate(epsilon)?;
        Ok(NoiseInjector { mechanism, epsilon })
    }

    /// Laplace injector
    pub fn laplace(epsilon: f64) -> Result<Self, DpValidationError> {
        Self::new(NoiseMechanism::Laplace, epsilon)
    }

    pub fn mechanism(&self) -> NoiseMechanism {
        self.mechanism
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Noise scale for a column of the given sensitivity
    pub fn scale(&self, sensitivity: Sensitivity) -> Result<f64, DpValidationError> {
        self.mechanism.scale(sensitivity.value(), self.epsilon)
    }

    /// `value + noise`; identity when the sensitivity is zero
    pub fn perturb<R: Rng + ?Sized>(
        &self,
        value: f64,
        sensitivity: Sensitivity,
        rng: &mut R,
    ) -> Result<f64, DpValidationError> {
        let scale = self.scale(sensitivity)?;
        if scale == 0.0 {
            return Ok(value);
        }
        Ok(value + self.mechanism.sample(scale, rng)?)
    }

    /// Perturb normalised values
    pub fn perturb_all<R: Rng + ?Sized>(
        &self,
        values: &[f64],
        sensitivity: Sensitivity,
        rng: &mut R,
    ) -> Result<Vec<f64>, DpValidationError> {
        let scale = self.scale(sensitivity)?;
        if scale == 0.0 {
            return Ok(values.to_vec());
        }
        values
            .iter()
            .map(|v| self.mechanism.sample(scale, rng).map(|noise| v + noise))
            .collect()
    }

    /// Perturb numeric cells; nulls and text cells pass through unchanged
    pub fn perturb_column<R: Rng + ?Sized>(
        &self,
        values: &[Value],
        sensitivity: Sensitivity,
        rng: &mut R,
    ) -> Result<Vec<Value>, DpValidationError> {
        let scale = self.scale(sensitivity)?;
        if scale == 0.0 {
            return Ok(values.to_vec());
        }
        values
            .iter()
            .map(|cell| match cell {
                Value::Number(n) => self
                    .mechanism
                    .sample(scale, rng)
                    .map(|noise| Value::Number(n + noise)),
                other => Ok(other.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sensitivity(v: f64) -> Sensitivity {
        Sensitivity::new(v).unwrap()
    }

    #[test]
    fn test_rejects_bad_epsilon() {
        assert!(NoiseInjector::laplace(0.0).is_err());
        assert!(NoiseInjector::new(NoiseMechanism::Gaussian { delta: 2.0 }, 1.0).is_err());
    }

    #[test]
    fn test_degenerate_sensitivity_returns_input() {
        let injector = NoiseInjector::laplace(1.0).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let out = injector
            .perturb_all(&[3.0, 3.0, 3.0], sensitivity(0.0), &mut rng)
            .unwrap();
        assert_eq!(out, vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_nulls_pass_through() {
        let injector = NoiseInjector::laplace(1.0).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let cells = vec![Value::Number(10.0), Value::Null, Value::text("x")];
        let out = injector
            .perturb_column(&cells, sensitivity(5.0), &mut rng)
            .unwrap();

        assert_eq!(out[1], Value::Null);
        assert_eq!(out[2], Value::text("x"));
        assert!(matches!(out[0], Value::Number(n) if n != 10.0));
    }

    #[test]
    fn test_repeated_draws_differ() {
        let injector = NoiseInjector::laplace(1.0).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let a = injector.perturb(50.0, sensitivity(10.0), &mut rng).unwrap();
        let b = injector.perturb(50.0, sensitivity(10.0), &mut rng).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_gaussian_injector() {
        let injector = NoiseInjector::new(NoiseMechanism::Gaussian { delta: 1e-6 }, 1.0).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let out = injector
            .perturb_all(&[1.0, 2.0, 3.0], sensitivity(2.0), &mut rng)
            .unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|v| v.is_finite()));
    }
}
