//! Random sources for the simulated live movement applied to table rates.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies the symmetric offset applied to each looked-up rate.
///
/// Implementations return a value in `[-0.5, 0.5]`; the rate source scales it
/// by its jitter band. Random draws stay in `[-0.5, 0.5)`, a fixed offset may
/// sit on either edge.
pub trait JitterSource: Send + Sync {
    fn offset(&self) -> f64;
}

/// Uniform jitter drawn from a standard RNG.
pub struct RandomJitter {
    rng: Mutex<StdRng>,
}

impl RandomJitter {
    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible jitter for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl JitterSource for RandomJitter {
    fn offset(&self) -> f64 {
        let sample: f64 = self.rng.lock().gen();
        sample - 0.5
    }
}

/// Table rates returned unperturbed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn offset(&self) -> f64 {
        0.0
    }
}

/// Always the same offset, clamped into the valid range.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(f64);

impl FixedJitter {
    pub fn new(offset: f64) -> Self {
        let offset = if offset.is_finite() { offset } else { 0.0 };
        Self(offset.clamp(-0.5, 0.5))
    }
}

impl JitterSource for FixedJitter {
    fn offset(&self) -> f64 {
        self.0
    }
}
