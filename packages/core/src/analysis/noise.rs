//! Injectable randomness for the synthesizer and projector

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Source of normally distributed draws.
///
/// Every random step in the analysis core goes through this trait so that
/// tests can pin the sequence.
pub trait NoiseSource {
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;
}

/// Normal draws backed by a `rand` generator
pub struct RandomNoise<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomNoise<StdRng> {
    /// Reproducible noise for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> NoiseSource for RandomNoise<R> {
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.rng),
            // Invalid parameters (negative or non-finite spread) degrade to the mean
            Err(_) => mean,
        }
    }
}

/// Deterministic noise: replays `values` in order, cycling when exhausted.
/// With no values every draw returns the requested mean.
#[derive(Debug, Clone, Default)]
pub struct FixedNoise {
    values: Vec<f64>,
    next: usize,
}

impl FixedNoise {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }

    /// Every draw returns exactly the requested mean
    pub fn mean() -> Self {
        Self::default()
    }
}

impl NoiseSource for FixedNoise {
    fn normal(&mut self, mean: f64, _std_dev: f64) -> f64 {
        if self.values.is_empty() {
            return mean;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
