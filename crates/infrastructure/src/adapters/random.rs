//! Random sources backed by the `rand` crate

use application::ports::RandomSource;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Draws from the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        rand::rng().random_range(0..bound)
    }
}

/// Deterministic generator seeded once, for reproducible fault sequences
#[derive(Debug, Clone)]
pub struct SeededRandomSource {
    rng: StdRng,
}

impl SeededRandomSource {
    /// Create a source that yields the same sequence for the same seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandomSource {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }
}
