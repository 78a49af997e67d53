//! Style fingerprints.
//!
//! A fingerprint is a seven-axis categorical descriptor attached to a
//! logo for display. The gated mode only hands out fingerprints drawn
//! from the enforced pools, and any stored fingerprint that drifts
//! outside them is repaired axis by axis on load.

mod axes;
mod classifier;

pub use axes::{
    enforced_combinations, enforced_sizes, unrestricted_combinations, unrestricted_sizes,
    BloomStyle, ChromeStyle, GlowStyle, GradientStyle, LightingStyle, PaletteStyle, StyleAxis,
    TextureStyle,
};
pub use classifier::{Coerced, FingerprintClassifier, StoredFingerprint, StyleFingerprint};
