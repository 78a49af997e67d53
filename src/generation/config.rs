//! Visual configuration derived from the seeded stream.

use super::palette::{Palette, Rgb, PALETTES};
use crate::prng::SeededRng;
use serde::{Deserialize, Serialize};

/// Border drawn around the logo canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    Solid,
    Double,
    Dashed,
    Dotted,
    Beveled,
}

impl BorderStyle {
    /// Draw order for the border pick.
    pub const ALL: [BorderStyle; 5] = [
        BorderStyle::Solid,
        BorderStyle::Double,
        BorderStyle::Dashed,
        BorderStyle::Dotted,
        BorderStyle::Beveled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Double => "double",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Beveled => "beveled",
        }
    }
}

/// Smallest pixel block edge.
pub const MIN_PIXEL_SIZE: i64 = 4;
/// Largest pixel block edge.
pub const MAX_PIXEL_SIZE: i64 = 8;
/// Probability that the background comes from the palette rather than black.
pub const PALETTE_BACKGROUND_CHANCE: f64 = 0.7;
/// Probability of the scanline overlay.
pub const SCANLINE_CHANCE: f64 = 0.5;

/// Fully resolved visual configuration of one logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub pixel_size: u32,
    pub palette_index: usize,
    pub palette_name: String,
    pub color_palette: Vec<Rgb>,
    pub border_style: BorderStyle,
    pub shadow_intensity: f64,
    pub glow_intensity: f64,
    pub background_color: Rgb,
    pub text_color: Rgb,
    pub shadow_color: Rgb,
    pub scanlines: bool,
}

impl GenerationConfig {
    /// Draws a configuration from the stream.
    ///
    /// The order of draws below is fixed. Moving, adding or removing a
    /// draw changes every logo ever generated.
    pub fn draw(rng: &mut SeededRng) -> Self {
        let pixel_size = rng.random_int(MIN_PIXEL_SIZE, MAX_PIXEL_SIZE) as u32;

        let palette_index = rng.random_int(0, PALETTES.len() as i64 - 1) as usize;
        let palette: Palette = PALETTES[palette_index];

        let border_style = rng
            .pick(&BorderStyle::ALL)
            .copied()
            .unwrap_or(BorderStyle::Solid);

        let shadow_intensity = rng.random(0.2, 0.8);
        let glow_intensity = rng.random(0.0, 0.6);

        let background_color = if rng.chance(PALETTE_BACKGROUND_CHANCE) {
            let darker = palette.darker_half();
            rng.pick(&darker).copied().unwrap_or(Rgb::BLACK)
        } else {
            Rgb::BLACK
        };

        let text_color = palette
            .first_distinct_from(background_color)
            .unwrap_or(Rgb::WHITE);

        let shadow_color = rng.pick(palette.colors).copied().unwrap_or(Rgb::BLACK);

        let scanlines = rng.chance(SCANLINE_CHANCE);

        Self {
            pixel_size,
            palette_index,
            palette_name: palette.name.to_string(),
            color_palette: palette.colors.to_vec(),
            border_style,
            shadow_intensity,
            glow_intensity,
            background_color,
            text_color,
            shadow_color,
            scanlines,
        }
    }

    /// Brightest palette entry, used for the glow halo.
    pub fn glow_color(&self) -> Rgb {
        self.color_palette
            .iter()
            .copied()
            .max_by_key(|c| c.luma())
            .unwrap_or(self.text_color)
    }
}
