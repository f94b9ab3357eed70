//! Injected random-number source
//!
//! Games draw randomness only through `RandomSource`, so a session seeded with
//! the same value replays identically.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub trait RandomSource {
    /// Uniform in `[0, 1)`
    fn next_f32(&mut self) -> f32;

    /// Uniform in `[min, max)`
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform index in `0..n` (`n` must be non-zero)
    fn below(&mut self, n: usize) -> usize {
        ((self.next_f32() * n as f32) as usize).min(n.saturating_sub(1))
    }

    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform angle in `[0, TAU)`
    fn angle(&mut self) -> f32 {
        self.next_f32() * std::f32::consts::TAU
    }
}

impl RandomSource for Pcg32 {
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Deterministic production source
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
