//! Rarity post-processing stages.
//!
//! Applied to a copy of a generated artifact for display. The base
//! artifact, and therefore its digest, is never touched. Every stage is
//! deterministic in its input so the same artifact and tier always
//! produce the same result.

use super::tier::{FilterStage, RarityTier};
use crate::generation::{Artifact, Rgb};

/// Luma above which a pixel counts as a highlight.
const HIGHLIGHT_LUMA: u32 = 128 * 1000;

fn chrome(artifact: &mut Artifact, intensity: f64) {
    let h = f64::from(artifact.height().max(1));
    artifact.map_pixels(|_, y, c| {
        let grey = (c.luma() / 1000).min(255) as u8;
        // brightest sheen across the middle band, darker at top and bottom
        let t = (2.0 * f64::from(y) / h - 1.0).abs();
        let sheen = Rgb::new(grey, grey, grey).scale(1.2 - 0.4 * t);
        c.mix(sheen, 0.5 * intensity)
    });
}

fn glow(artifact: &mut Artifact, intensity: f64) {
    artifact.map_pixels(|_, _, c| {
        if c.luma() > HIGHLIGHT_LUMA {
            c.mix(Rgb::WHITE, 0.3 * intensity)
        } else {
            c
        }
    });
}

fn bloom(artifact: &mut Artifact, intensity: f64) {
    const RADIUS: i64 = 2;
    let (w, h) = (i64::from(artifact.width()), i64::from(artifact.height()));
    let bright: Vec<[u32; 3]> = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .map(|(x, y)| match artifact.get(x as u32, y as u32) {
            Some(c) if c.luma() > HIGHLIGHT_LUMA => [u32::from(c.r), u32::from(c.g), u32::from(c.b)],
            _ => [0; 3],
        })
        .collect();

    let source = artifact.clone();
    let window = ((2 * RADIUS + 1) * (2 * RADIUS + 1)) as f64;
    for y in 0..h {
        for x in 0..w {
            let mut sum = [0u32; 3];
            for dy in -RADIUS..=RADIUS {
                for dx in -RADIUS..=RADIUS {
                    let (sx, sy) = (x + dx, y + dy);
                    if sx < 0 || sy < 0 || sx >= w || sy >= h {
                        continue;
                    }
                    let b = bright[(sy * w + sx) as usize];
                    sum[0] += b[0];
                    sum[1] += b[1];
                    sum[2] += b[2];
                }
            }
            if let Some(c) = source.get(x as u32, y as u32) {
                let add = |base: u8, s: u32| {
                    let v = f64::from(base) + f64::from(s) / window * 0.5 * intensity;
                    v.round().clamp(0.0, 255.0) as u8
                };
                artifact.set(
                    x as u32,
                    y as u32,
                    Rgb::new(add(c.r, sum[0]), add(c.g, sum[1]), add(c.b, sum[2])),
                );
            }
        }
    }
}

/// Spatial hash noise in `[-12, 12]`.
fn grain(x: u32, y: u32) -> i32 {
    let h = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
    (h % 25) as i32 - 12
}

fn texture(artifact: &mut Artifact, intensity: f64) {
    artifact.map_pixels(|x, y, c| {
        let n = (f64::from(grain(x, y)) * intensity).round() as i32;
        let add = |v: u8| (i32::from(v) + n).clamp(0, 255) as u8;
        Rgb::new(add(c.r), add(c.g), add(c.b))
    });
}

/// Applies one stage at the given intensity.
pub fn apply_stage(artifact: &mut Artifact, stage: FilterStage, intensity: f64) {
    match stage {
        FilterStage::Chrome => chrome(artifact, intensity),
        FilterStage::Glow => glow(artifact, intensity),
        FilterStage::Bloom => bloom(artifact, intensity),
        FilterStage::Texture => texture(artifact, intensity),
    }
}

/// Returns a copy of `artifact` with the tier's stages applied in order.
pub fn apply_effects(artifact: &Artifact, tier: RarityTier) -> Artifact {
    let mut out = artifact.clone();
    for stage in tier.stages() {
        apply_stage(&mut out, *stage, tier.intensity());
    }
    tracing::trace!(tier = %tier, stages = tier.stages().len(), "Applied rarity effects");
    out
}
