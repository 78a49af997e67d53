//! Seed type and the stable derivations that produce one.

use blake3::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain separator for deriving a seed from an exclusive pool token.
const TOKEN_SEED_DOMAIN: &[u8] = b"pixel-forge-token-seed-v1";

/// Seed validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("seed {0} is outside [0, 2147483647]")]
    OutOfRange(i64),
}

/// Integer in `[0, 2^31 - 1]` driving a [`SeededRng`](super::SeededRng).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Seed(u32);

impl Seed {
    /// Largest accepted seed.
    pub const MAX: u32 = i32::MAX as u32;

    /// Creates a seed, rejecting values above [`Seed::MAX`].
    pub fn new(value: u32) -> Result<Self, SeedError> {
        if value > Self::MAX {
            return Err(SeedError::OutOfRange(i64::from(value)));
        }
        Ok(Self(value))
    }

    /// Derives the seed used when the caller supplies none.
    ///
    /// Java-style string hash over UTF-16 code units with 32-bit signed
    /// wrapping at every step, then the absolute value. `i32::MIN` has no
    /// positive counterpart in range and maps to 0.
    pub fn from_text(text: &str) -> Self {
        let hash = text
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
        Self(hash.unsigned_abs() & Self::MAX)
    }

    /// Derives a seed from an exclusive pool token.
    pub fn from_token(token: &str) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(TOKEN_SEED_DOMAIN);
        hasher.update(token.as_bytes());
        let digest = hasher.finalize();
        let bytes = digest.as_bytes();
        let raw = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Self(raw & Self::MAX)
    }

    /// Returns the numeric value.
    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Seed {
    type Error = SeedError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or(SeedError::OutOfRange(value))
    }
}

impl From<Seed> for i64 {
    fn from(seed: Seed) -> Self {
        i64::from(seed.0)
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
