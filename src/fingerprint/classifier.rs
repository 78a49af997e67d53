//! Enforced-pool generation, validation and repair.

use super::axes::{
    BloomStyle, ChromeStyle, GlowStyle, GradientStyle, LightingStyle, PaletteStyle, StyleAxis,
    TextureStyle,
};
use crate::prng::{EntropySource, UniformExt};
use rand_core::RngCore;
use serde::{Deserialize, Serialize};

/// Seven-axis style descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleFingerprint {
    pub palette: PaletteStyle,
    pub gradient: GradientStyle,
    pub glow: GlowStyle,
    pub chrome: ChromeStyle,
    pub bloom: BloomStyle,
    pub texture: TextureStyle,
    pub lighting: LightingStyle,
}

/// A fingerprint as loaded from storage, one free-form string per axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFingerprint {
    pub palette: String,
    pub gradient: String,
    pub glow: String,
    pub chrome: String,
    pub bloom: String,
    pub texture: String,
    pub lighting: String,
}

impl From<&StyleFingerprint> for StoredFingerprint {
    fn from(fp: &StyleFingerprint) -> Self {
        Self {
            palette: fp.palette.as_str().to_string(),
            gradient: fp.gradient.as_str().to_string(),
            glow: fp.glow.as_str().to_string(),
            chrome: fp.chrome.as_str().to_string(),
            bloom: fp.bloom.as_str().to_string(),
            texture: fp.texture.as_str().to_string(),
            lighting: fp.lighting.as_str().to_string(),
        }
    }
}

/// Outcome of a repair: the fingerprint and the axes that were redrawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coerced {
    pub fingerprint: StyleFingerprint,
    pub repaired: Vec<&'static str>,
}

impl Coerced {
    pub fn was_repaired(&self) -> bool {
        !self.repaired.is_empty()
    }
}

fn draw<A: StyleAxis, R: RngCore + ?Sized>(pool: &'static [A], rng: &mut R) -> A {
    // pools are compile-time constants and never empty
    pool[rng.below(pool.len())]
}

/// Keeps `current` if it is in the enforced pool, otherwise redraws it.
fn repair<A: StyleAxis, R: RngCore + ?Sized>(
    current: Option<A>,
    raw: &str,
    rng: &mut R,
    repaired: &mut Vec<&'static str>,
) -> A {
    match current {
        Some(v) if v.is_enforced() => v,
        _ => {
            let replacement = draw(A::enforced(), rng);
            tracing::warn!(
                axis = A::AXIS,
                value = raw,
                replacement = replacement.as_str(),
                "Fingerprint axis outside enforced pool, repaired"
            );
            repaired.push(A::AXIS);
            replacement
        }
    }
}

/// Derives, validates and repairs style fingerprints.
///
/// Draws use non-seeded randomness; fingerprints only need variety.
/// The classifier holds no state and is safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintClassifier;

impl FingerprintClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Uniform draw per axis from the enforced pools.
    pub fn generate_enforced(&self) -> StyleFingerprint {
        self.generate_enforced_with(&mut EntropySource::from_os_entropy())
    }

    /// [`generate_enforced`](Self::generate_enforced) with a caller-supplied
    /// source.
    pub fn generate_enforced_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> StyleFingerprint {
        StyleFingerprint {
            palette: draw(PaletteStyle::ENFORCED, rng),
            gradient: draw(GradientStyle::ENFORCED, rng),
            glow: draw(GlowStyle::ENFORCED, rng),
            chrome: draw(ChromeStyle::ENFORCED, rng),
            bloom: draw(BloomStyle::ENFORCED, rng),
            texture: draw(TextureStyle::ENFORCED, rng),
            lighting: draw(LightingStyle::ENFORCED, rng),
        }
    }

    /// Uniform draw per axis from the unrestricted pools.
    pub fn generate_unrestricted_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> StyleFingerprint {
        StyleFingerprint {
            palette: draw(PaletteStyle::ALL, rng),
            gradient: draw(GradientStyle::ALL, rng),
            glow: draw(GlowStyle::ALL, rng),
            chrome: draw(ChromeStyle::ALL, rng),
            bloom: draw(BloomStyle::ALL, rng),
            texture: draw(TextureStyle::ALL, rng),
            lighting: draw(LightingStyle::ALL, rng),
        }
    }

    /// Uniform draw per axis from the unrestricted pools.
    pub fn generate_unrestricted(&self) -> StyleFingerprint {
        self.generate_unrestricted_with(&mut EntropySource::from_os_entropy())
    }

    /// True iff every axis value is in its enforced pool.
    pub fn is_valid_enforced(&self, fp: &StyleFingerprint) -> bool {
        fp.palette.is_enforced()
            && fp.gradient.is_enforced()
            && fp.glow.is_enforced()
            && fp.chrome.is_enforced()
            && fp.bloom.is_enforced()
            && fp.texture.is_enforced()
            && fp.lighting.is_enforced()
    }

    /// Redraws only the axes outside their enforced pool.
    pub fn coerce_to_enforced(&self, fp: &StyleFingerprint) -> StyleFingerprint {
        self.coerce_to_enforced_with(fp, &mut EntropySource::from_os_entropy())
            .fingerprint
    }

    /// [`coerce_to_enforced`](Self::coerce_to_enforced) with a caller-supplied
    /// source, reporting which axes changed.
    pub fn coerce_to_enforced_with<R: RngCore + ?Sized>(
        &self,
        fp: &StyleFingerprint,
        rng: &mut R,
    ) -> Coerced {
        let mut repaired = Vec::new();
        let fingerprint = StyleFingerprint {
            palette: repair(Some(fp.palette), fp.palette.as_str(), rng, &mut repaired),
            gradient: repair(Some(fp.gradient), fp.gradient.as_str(), rng, &mut repaired),
            glow: repair(Some(fp.glow), fp.glow.as_str(), rng, &mut repaired),
            chrome: repair(Some(fp.chrome), fp.chrome.as_str(), rng, &mut repaired),
            bloom: repair(Some(fp.bloom), fp.bloom.as_str(), rng, &mut repaired),
            texture: repair(Some(fp.texture), fp.texture.as_str(), rng, &mut repaired),
            lighting: repair(Some(fp.lighting), fp.lighting.as_str(), rng, &mut repaired),
        };
        Coerced {
            fingerprint,
            repaired,
        }
    }

    /// Loads a stored fingerprint, redrawing any axis that is unknown or
    /// outside the enforced pool. Never fails.
    pub fn heal_stored(&self, stored: &StoredFingerprint) -> Coerced {
        self.heal_stored_with(stored, &mut EntropySource::from_os_entropy())
    }

    /// [`heal_stored`](Self::heal_stored) with a caller-supplied source.
    pub fn heal_stored_with<R: RngCore + ?Sized>(
        &self,
        stored: &StoredFingerprint,
        rng: &mut R,
    ) -> Coerced {
        let mut repaired = Vec::new();
        let fingerprint = StyleFingerprint {
            palette: repair(PaletteStyle::parse(&stored.palette), &stored.palette, rng, &mut repaired),
            gradient: repair(GradientStyle::parse(&stored.gradient), &stored.gradient, rng, &mut repaired),
            glow: repair(GlowStyle::parse(&stored.glow), &stored.glow, rng, &mut repaired),
            chrome: repair(ChromeStyle::parse(&stored.chrome), &stored.chrome, rng, &mut repaired),
            bloom: repair(BloomStyle::parse(&stored.bloom), &stored.bloom, rng, &mut repaired),
            texture: repair(TextureStyle::parse(&stored.texture), &stored.texture, rng, &mut repaired),
            lighting: repair(LightingStyle::parse(&stored.lighting), &stored.lighting, rng, &mut repaired),
        };
        Coerced {
            fingerprint,
            repaired,
        }
    }
}
