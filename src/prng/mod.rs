//! Random number sources.
//!
//! [`SeededRng`] is the reproducible stream behind logo generation.
//! [`EntropySource`] is the non-reproducible stream behind fingerprint
//! and rarity draws.

mod entropy;
mod seed;
mod seeded;

pub use entropy::{EntropySource, UniformExt};
pub use seed::{Seed, SeedError};
pub use seeded::{SeededRng, INCREMENT, MODULUS, MULTIPLIER};
