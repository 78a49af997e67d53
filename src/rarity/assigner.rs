//! Weighted tier draws and gated-mode badge rolls.

use super::tier::{FilterStage, RarityTier};
use crate::prng::{EntropySource, UniformExt};
use rand_core::RngCore;
use serde::{Deserialize, Serialize};

/// Badges the gated mode may award.
pub const BADGES: [&str; 8] = [
    "genesis",
    "forged",
    "pixel-perfect",
    "neon-soul",
    "retro-king",
    "chrome-plated",
    "limited-run",
    "first-edition",
];

/// Fewest badges awarded in the gated mode.
pub const MIN_BADGES: usize = 2;
/// Most badges awarded in the gated mode.
pub const MAX_BADGES: usize = 4;

/// Everything a rarity roll decides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityRoll {
    pub tier: RarityTier,
    pub intensity: f64,
    pub stages: Vec<FilterStage>,
    pub badges: Vec<String>,
}

/// Draws rarity tiers from non-seeded randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct RarityAssigner;

impl RarityAssigner {
    pub fn new() -> Self {
        Self
    }

    /// Draws a tier.
    pub fn assign(&self) -> RarityTier {
        self.assign_with(&mut EntropySource::from_os_entropy())
    }

    /// Draws a tier from a caller-supplied source.
    pub fn assign_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> RarityTier {
        RarityTier::from_unit(rng.unit_f64())
    }

    /// Draws between [`MIN_BADGES`] and [`MAX_BADGES`] distinct badges,
    /// in draw order.
    pub fn roll_badges_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let count = MIN_BADGES + rng.below(MAX_BADGES - MIN_BADGES + 1);
        let mut pool: Vec<&str> = BADGES.to_vec();
        // partial Fisher-Yates: the first `count` slots end up a uniform sample
        for i in 0..count {
            let j = i + rng.below(pool.len() - i);
            pool.swap(i, j);
        }
        pool.into_iter().take(count).map(str::to_string).collect()
    }

    /// Full gated-mode roll: tier, intensity, stages and badges.
    pub fn roll_exclusive(&self) -> RarityRoll {
        self.roll_exclusive_with(&mut EntropySource::from_os_entropy())
    }

    /// [`roll_exclusive`](Self::roll_exclusive) with a caller-supplied source.
    pub fn roll_exclusive_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> RarityRoll {
        let tier = self.assign_with(rng);
        let badges = self.roll_badges_with(rng);
        tracing::debug!(tier = %tier, badges = badges.len(), "Rolled rarity");
        RarityRoll {
            tier,
            intensity: tier.intensity(),
            stages: tier.stages().to_vec(),
            badges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_distribution_within_one_percent() {
        let assigner = RarityAssigner::new();
        let mut rng = EntropySource::from_fixed_key([11u8; 32]);
        let n = 100_000;
        let mut counts = [0usize; 4];
        for _ in 0..n {
            let tier = assigner.assign_with(&mut rng);
            counts[tier as usize] += 1;
        }
        for (tier, count) in RarityTier::ALL.iter().zip(counts) {
            let observed = count as f64 / n as f64;
            assert!(
                (observed - tier.weight()).abs() < 0.01,
                "{tier}: observed {observed}, expected {}",
                tier.weight()
            );
        }
    }

    #[test]
    fn test_badges_distinct_and_bounded() {
        let assigner = RarityAssigner::new();
        let mut rng = EntropySource::from_fixed_key([5u8; 32]);
        let mut sizes = HashSet::new();
        for _ in 0..1_000 {
            let badges = assigner.roll_badges_with(&mut rng);
            assert!((MIN_BADGES..=MAX_BADGES).contains(&badges.len()));
            let unique: HashSet<_> = badges.iter().collect();
            assert_eq!(unique.len(), badges.len());
            assert!(badges.iter().all(|b| BADGES.contains(&b.as_str())));
            sizes.insert(badges.len());
        }
        assert_eq!(sizes.len(), 3);
    }

    #[test]
    fn test_exclusive_roll_matches_tier() {
        let roll = RarityAssigner::new().roll_exclusive();
        assert_eq!(roll.stages, roll.tier.stages());
        assert_eq!(roll.intensity, roll.tier.intensity());
    }
}
