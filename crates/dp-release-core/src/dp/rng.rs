//! Randomness for Noise Mechanisms
//!
//! Each unit of work (one column) owns its own ChaCha20 generator seeded
//! from OS entropy. Generators are never shared between columns or threads,
//! so parallel columns draw independent, uncorrelated noise without locking.
//!
//! The helpers here take any [`Rng`], which lets tests drive the mechanisms
//! with a seeded generator.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Generator type used for noise draws
pub type NoiseRng = ChaCha20Rng;

/// Fresh generator for one column, seeded from OS entropy
pub fn column_rng() -> NoiseRng {
    ChaCha20Rng::from_entropy()
}

/// Uniform f64 in the open interval (-0.5, 0.5), excluding exactly 0
///
/// Needed by the Laplace inverse CDF: both `-0.5` and `0` would produce a
/// degenerate draw.
pub fn uniform_centered<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let centered = rng.gen::<f64>() - 0.5;
        if centered.abs() > 1e-15 && centered > -0.5 {
            return centered;
        }
    }
}

/// Two independent uniforms in (0, 1] for the Box-Muller transform
pub fn uniform_pair<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    // 1 - [0, 1) keeps ln(u1) finite
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = 1.0 - rng.gen::<f64>();
    (u1, u2)
}
