//! Injectable random source for loss, jitter and initial world state

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness. Implementations must return values in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform sample in `[low, high)`; returns `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }

    /// Returns true with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }
}

/// Reproducible random source backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
