use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random numbers in [0, 1)
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;
}

/// Seedable production random source
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
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
    fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f32>,
    index: usize,
}

impl SequenceRandom {
    /// Values are clamped into [0, 1); an empty list always yields 0
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        Self { values, index: 0 }
    }

    /// Number of values drawn so far
    pub fn drawn(&self) -> usize {
        self.index
    }
}

impl RandomSource for SequenceRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}
