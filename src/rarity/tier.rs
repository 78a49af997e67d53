//! Rarity tiers and what each one unlocks.

use serde::{Deserialize, Serialize};

/// Post-processing filter stage, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterStage {
    Chrome,
    Glow,
    Bloom,
    Texture,
}

impl FilterStage {
    /// Fixed application order.
    pub const ORDER: [FilterStage; 4] = [
        FilterStage::Chrome,
        FilterStage::Glow,
        FilterStage::Bloom,
        FilterStage::Texture,
    ];
}

/// Rarity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RarityTier {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl RarityTier {
    /// Tiers in ascending rarity.
    pub const ALL: [RarityTier; 4] = [
        RarityTier::Common,
        RarityTier::Rare,
        RarityTier::Epic,
        RarityTier::Legendary,
    ];

    /// Probability of this tier.
    pub fn weight(self) -> f64 {
        match self {
            RarityTier::Common => 0.50,
            RarityTier::Rare => 0.30,
            RarityTier::Epic => 0.15,
            RarityTier::Legendary => 0.05,
        }
    }

    /// Upper bound of this tier's cumulative-weight interval.
    pub fn cumulative_threshold(self) -> f64 {
        match self {
            RarityTier::Common => 0.50,
            RarityTier::Rare => 0.80,
            RarityTier::Epic => 0.95,
            RarityTier::Legendary => 1.00,
        }
    }

    /// Classifies a uniform draw in `[0, 1)`.
    pub fn from_unit(u: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| u < t.cumulative_threshold())
            .unwrap_or(RarityTier::Legendary)
    }

    /// Effect intensity multiplier in `[0.5, 1.0]`.
    pub fn intensity(self) -> f64 {
        match self {
            RarityTier::Common => 0.5,
            RarityTier::Rare => 0.7,
            RarityTier::Epic => 0.85,
            RarityTier::Legendary => 1.0,
        }
    }

    /// Filter stages this tier applies, as a prefix of [`FilterStage::ORDER`].
    pub fn stages(self) -> &'static [FilterStage] {
        let n = match self {
            RarityTier::Common => 1,
            RarityTier::Rare => 2,
            RarityTier::Epic => 3,
            RarityTier::Legendary => 4,
        };
        &FilterStage::ORDER[..n]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RarityTier::Common => "COMMON",
            RarityTier::Rare => "RARE",
            RarityTier::Epic => "EPIC",
            RarityTier::Legendary => "LEGENDARY",
        }
    }
}

impl std::fmt::Display for RarityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
