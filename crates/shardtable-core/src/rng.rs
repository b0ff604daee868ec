//! Random source abstraction for determinism.
//!
//! Initiative rolls draw through this trait so the turn-order coordinator
//! stays a deterministic function of its inputs under test.

use rand::Rng;

/// Abstraction over die rolls.
pub trait RandomSource: Send + Sync {
    /// Rolls one die, uniformly distributed in `[1, sides]`.
    fn roll(&mut self, sides: u32) -> u32;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn roll(&mut self, sides: u32) -> u32 {
        rand::rng().random_range(1..=sides)
    }
}
