//! Index Pickers
//!
//! How the scheduler chooses the next catalog entry. Production uses a
//! uniform random pick; tests plug in a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses an index in `0..len`
pub trait IndexPicker: Send {
    /// Pick an index; `len` is always at least 1
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random pick
pub struct UniformPicker {
    rng: StdRng,
}

impl UniformPicker {
    /// Seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible picks for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexPicker for UniformPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

/// Cycles through a fixed list of indices, reduced modulo `len`
#[derive(Clone, Debug)]
pub struct SequencePicker {
    sequence: Vec<usize>,
    position: usize,
}

impl SequencePicker {
    pub fn new(sequence: impl Into<Vec<usize>>) -> Self {
        Self {
            sequence: sequence.into(),
            position: 0,
        }
    }

    /// How many picks have been made
    pub fn picks(&self) -> usize {
        self.position
    }
}

impl IndexPicker for SequencePicker {
    fn pick(&mut self, len: usize) -> usize {
        let len = len.max(1);
        if self.sequence.is_empty() {
            self.position += 1;
            return 0;
        }
        let value = self.sequence[self.position % self.sequence.len()];
        self.position += 1;
        value % len
    }
}
