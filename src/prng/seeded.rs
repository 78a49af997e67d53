//! Linear congruential generator driving every seeded draw.
//!
//! The multiplier, increment and modulus are fixed: two independent
//! implementations fed the same seed must produce the same sequence,
//! so none of them may ever change.

use super::Seed;

/// LCG multiplier.
pub const MULTIPLIER: u64 = 9301;
/// LCG increment.
pub const INCREMENT: u64 = 49297;
/// LCG modulus. `next()` returns `state / MODULUS`.
pub const MODULUS: u64 = 233_280;

/// Deterministic number stream seeded from a [`Seed`].
///
/// The state step is exact integer arithmetic; only the final division
/// into `[0, 1)` touches floating point, and IEEE-754 division is
/// correctly rounded, so the result is identical on every platform.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
    draws: u64,
}

impl SeededRng {
    /// Creates a stream whose initial state is the seed.
    pub fn new(seed: Seed) -> Self {
        Self {
            state: u64::from(seed.value()),
            draws: 0,
        }
    }

    /// Advances the state and returns a value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        // seed <= 2^31 - 1 so the product stays well below 2^64
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.draws += 1;
        self.state as f64 / MODULUS as f64
    }

    /// Returns `min + next() * (max - min)`.
    pub fn random(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// Returns an integer in `[min, max]`, both ends inclusive.
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        self.random(min as f64, (max + 1) as f64).floor() as i64
    }

    /// Picks one element uniformly. Returns `None` for an empty slice
    /// without consuming a draw.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.random_int(0, items.len() as i64 - 1);
        items.get(idx as usize)
    }

    /// Returns `true` with probability `p`. Consumes exactly one draw.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }

    /// Number of draws consumed so far.
    #[inline]
    pub fn draws(&self) -> u64 {
        self.draws
    }
}
