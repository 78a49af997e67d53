//! Deterministic logo generation.
//!
//! ```text
//! text ─┬─> seed ──> SeededRng ──> GenerationConfig
//!       └──────────────────────────────┴──> layers ──> pixelate ──> post-process
//! ```
//!
//! `generate` is a pure function of `(text, seed, settings)`: no clock,
//! no I/O and no randomness beyond the seeded stream. The same inputs
//! give a byte-identical [`Artifact`] on every run and every machine.

mod artifact;
mod config;
pub mod font;
mod palette;
mod postprocess;
mod quantize;
mod render;

pub use artifact::Artifact;
pub use config::{BorderStyle, GenerationConfig, MAX_PIXEL_SIZE, MIN_PIXEL_SIZE};
pub use palette::{Palette, Rgb, PALETTES};
pub use postprocess::{scanlines, vignette};
pub use quantize::pixelate;
pub use render::TextMask;

use crate::prng::{Seed, SeededRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted text, in characters, after trimming.
pub const MAX_TEXT_CHARS: usize = 30;

/// Input rejected before any draw.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("text is empty after trimming")]
    EmptyText,
    #[error("text has {0} characters, limit is {MAX_TEXT_CHARS}")]
    TextTooLong(usize),
    #[error("seed {0} is outside [0, 2147483647]")]
    SeedOutOfRange(i64),
    #[error("invalid canvas settings: {0}")]
    InvalidSettings(String),
}

/// Canvas dimensions for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 256,
        }
    }
}

impl GeneratorSettings {
    /// Validates the canvas dimensions.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width < 64 || self.height < 32 {
            return Err(GenerationError::InvalidSettings(format!(
                "canvas {}x{} is below the 64x32 minimum",
                self.width, self.height
            )));
        }
        if self.width > 4096 || self.height > 4096 {
            return Err(GenerationError::InvalidSettings(format!(
                "canvas {}x{} exceeds 4096 on a side",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Result of one generation.
#[derive(Debug, Clone)]
pub struct GeneratedLogo {
    pub artifact: Artifact,
    pub seed_used: Seed,
    pub config: GenerationConfig,
}

impl GeneratedLogo {
    /// SHA-256 of the artifact.
    pub fn digest(&self) -> String {
        self.artifact.digest()
    }
}

/// Trims and bounds-checks caller text.
pub fn validate_text(text: &str) -> Result<&str, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyText);
    }
    let chars = trimmed.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(GenerationError::TextTooLong(chars));
    }
    Ok(trimmed)
}

/// Stateless logo generator. Safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct LogoGenerator {
    settings: GeneratorSettings,
}

impl LogoGenerator {
    /// Creates a generator, validating the canvas settings.
    pub fn new(settings: GeneratorSettings) -> Result<Self, GenerationError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generates a logo. Without a seed, one is derived from the trimmed
    /// text.
    pub fn generate(&self, text: &str, seed: Option<i64>) -> Result<GeneratedLogo, GenerationError> {
        let text = validate_text(text)?;
        let seed = match seed {
            Some(raw) => Seed::try_from(raw).map_err(|_| GenerationError::SeedOutOfRange(raw))?,
            None => Seed::from_text(text),
        };
        Ok(self.generate_with_seed(text, seed))
    }

    /// Generates from already-validated text and a resolved seed.
    pub fn generate_with_seed(&self, text: &str, seed: Seed) -> GeneratedLogo {
        let mut rng = SeededRng::new(seed);
        let config = GenerationConfig::draw(&mut rng);

        let layered = render::render_layers(text, &config, self.settings.width, self.settings.height);
        let mut artifact = pixelate(&layered, config.pixel_size);

        if config.scanlines {
            scanlines(&mut artifact);
        }
        vignette(&mut artifact);

        tracing::debug!(
            seed = seed.value(),
            palette = %config.palette_name,
            border = config.border_style.as_str(),
            pixel_size = config.pixel_size,
            draws = rng.draws(),
            "Generated logo"
        );

        GeneratedLogo {
            artifact,
            seed_used: seed,
            config,
        }
    }
}
