//! Rarity tiers.
//!
//! A tier is drawn with fixed weights (50/30/15/5 percent) and decides
//! how many post-processing stages run on the display copy of a logo
//! and at what intensity.

mod assigner;
mod effects;
mod tier;

pub use assigner::{RarityAssigner, RarityRoll, BADGES, MAX_BADGES, MIN_BADGES};
pub use effects::{apply_effects, apply_stage};
pub use tier::{FilterStage, RarityTier};
