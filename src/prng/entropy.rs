//! Non-seeded randomness for paths that want variety, not reproducibility.
//!
//! Fingerprint generation and rarity rolls draw from a ChaCha20 stream
//! keyed from the OS entropy source. Pool tokens skip this layer and
//! read `OsRng` directly.

use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng};

/// ChaCha20 stream seeded from OS entropy.
pub struct EntropySource {
    inner: ChaCha20Rng,
    bytes_generated: u64,
}

impl EntropySource {
    /// Creates a stream keyed from the OS entropy source.
    pub fn from_os_entropy() -> Self {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        Self {
            inner: ChaCha20Rng::from_seed(key),
            bytes_generated: 0,
        }
    }

    /// Creates a stream from a fixed key. Only useful for tests and
    /// benchmarks that need repeatable "random" draws.
    pub fn from_fixed_key(key: [u8; 32]) -> Self {
        Self {
            inner: ChaCha20Rng::from_seed(key),
            bytes_generated: 0,
        }
    }

    /// Bytes handed out since construction.
    pub fn bytes_generated(&self) -> u64 {
        self.bytes_generated
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::from_os_entropy()
    }
}

impl RngCore for EntropySource {
    fn next_u32(&mut self) -> u32 {
        self.bytes_generated += 4;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.bytes_generated += 8;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.bytes_generated += dest.len() as u64;
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.bytes_generated += dest.len() as u64;
        self.inner.try_fill_bytes(dest)
    }
}

/// Uniform helpers over any [`RngCore`].
pub trait UniformExt: RngCore {
    /// Uniform `f64` in `[0, 1)` with 53 bits of precision.
    fn unit_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform index in `[0, n)` without modulo bias. `n` must be non-zero.
    fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "below(0) has no valid output");
        let n = n as u64;
        // reject the short tail so every residue is equally likely
        let zone = u64::MAX - (u64::MAX % n);
        loop {
            let v = self.next_u64();
            if v < zone {
                return (v % n) as usize;
            }
        }
    }

    /// Uniform choice from a non-empty slice.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.below(items.len());
        items.get(idx)
    }
}

impl<R: RngCore + ?Sized> UniformExt for R {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_key_repeatable() {
        let mut a = EntropySource::from_fixed_key([7u8; 32]);
        let mut b = EntropySource::from_fixed_key([7u8; 32]);
        assert_eq!(a.next_u64(), b.next_u64());
        assert_eq!(a.bytes_generated(), 8);
    }

    #[test]
    fn test_os_entropy_streams_differ() {
        let mut a = EntropySource::from_os_entropy();
        let mut b = EntropySource::from_os_entropy();
        let mut out_a = [0u8; 32];
        let mut out_b = [0u8; 32];
        a.fill_bytes(&mut out_a);
        b.fill_bytes(&mut out_b);
        assert_ne!(out_a, out_b);
    }

    #[test]
    fn test_unit_and_below_bounds() {
        let mut rng = EntropySource::from_fixed_key([1u8; 32]);
        for _ in 0..10_000 {
            let u = rng.unit_f64();
            assert!((0.0..1.0).contains(&u));
            assert!(rng.below(9) < 9);
        }
    }

    #[test]
    fn test_choose_empty() {
        let mut rng = EntropySource::from_fixed_key([1u8; 32]);
        let empty: [u32; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }
}
