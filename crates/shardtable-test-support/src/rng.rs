//! Test RNGs — deterministic `RandomSource` implementations for tests.

use shardtable_core::rng::RandomSource;

/// A source that always returns the same value, regardless of die size.
/// Suitable for tests that do not depend on specific draws.
#[derive(Debug, Clone, Copy)]
pub struct ConstRng(pub u32);

impl RandomSource for ConstRng {
    fn roll(&mut self, _sides: u32) -> u32 {
        self.0
    }
}

/// A source that returns draws from a predetermined sequence. Panics if the
/// sequence is exhausted, so a test also asserts how many dice were drawn.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Creates a new `SequenceRng` with the given draws.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Returns how many draws are left unconsumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len() - self.index
    }
}

impl RandomSource for SequenceRng {
    fn roll(&mut self, _sides: u32) -> u32 {
        let value = self.values[self.index];
        self.index += 1;
        value
    }
}
