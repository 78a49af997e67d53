//! Colour type and the fixed library of retro palettes.
//!
//! The order of [`PALETTES`] and of the entries inside each palette is
//! part of the generation contract: the palette index and every colour
//! pick are PRNG draws over these slices.

use serde::{Deserialize, Serialize};

/// 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::hex(0x000000);
    pub const WHITE: Rgb = Rgb::hex(0xffffff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a colour from `0xRRGGBB`.
    pub const fn hex(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }

    /// Integer luma, `299 R + 587 G + 114 B` (scaled by 1000).
    #[inline]
    pub const fn luma(self) -> u32 {
        299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32
    }

    /// Linear blend toward `other` by `t` in `[0, 1]`, rounded.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }

    /// Multiplies every channel by `factor`, rounded and clamped.
    pub fn scale(self, factor: f64) -> Rgb {
        let s = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Rgb::new(s(self.r), s(self.g), s(self.b))
    }

    /// `#rrggbb` form.
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

/// A named retro palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub colors: &'static [Rgb],
}

impl Palette {
    /// The darker half of the palette: entries stably sorted by luma,
    /// first `len / 2` kept.
    pub fn darker_half(&self) -> Vec<Rgb> {
        let mut sorted = self.colors.to_vec();
        sorted.sort_by_key(|c| c.luma());
        sorted.truncate(self.colors.len() / 2);
        sorted
    }

    /// First entry that differs from `background`.
    pub fn first_distinct_from(&self, background: Rgb) -> Option<Rgb> {
        self.colors.iter().copied().find(|c| *c != background)
    }
}

/// The palette library, in draw order.
pub const PALETTES: [Palette; 8] = [
    Palette {
        name: "gameboy",
        colors: &[
            Rgb::hex(0x0f380f),
            Rgb::hex(0x306230),
            Rgb::hex(0x8bac0f),
            Rgb::hex(0x9bbc0f),
        ],
    },
    Palette {
        name: "pico8",
        colors: &[
            Rgb::hex(0x1d2b53),
            Rgb::hex(0x7e2553),
            Rgb::hex(0x008751),
            Rgb::hex(0xab5236),
            Rgb::hex(0xff004d),
            Rgb::hex(0xffa300),
            Rgb::hex(0xffec27),
            Rgb::hex(0xfff1e8),
        ],
    },
    Palette {
        name: "synthwave",
        colors: &[
            Rgb::hex(0x2b0f54),
            Rgb::hex(0xab1f65),
            Rgb::hex(0xff4f69),
            Rgb::hex(0xfff7f8),
            Rgb::hex(0xff8142),
            Rgb::hex(0xffda45),
        ],
    },
    Palette {
        name: "cga",
        colors: &[
            Rgb::hex(0x000000),
            Rgb::hex(0x55ffff),
            Rgb::hex(0xff55ff),
            Rgb::hex(0xffffff),
        ],
    },
    Palette {
        name: "c64",
        colors: &[
            Rgb::hex(0x40318d),
            Rgb::hex(0x883932),
            Rgb::hex(0x67b6bd),
            Rgb::hex(0x8b5429),
            Rgb::hex(0xb8c76f),
            Rgb::hex(0x9ae29b),
        ],
    },
    Palette {
        name: "vaporwave",
        colors: &[
            Rgb::hex(0x1a1a2e),
            Rgb::hex(0xff71ce),
            Rgb::hex(0x01cdfe),
            Rgb::hex(0x05ffa1),
            Rgb::hex(0xb967ff),
            Rgb::hex(0xfffb96),
        ],
    },
    Palette {
        name: "amber",
        colors: &[
            Rgb::hex(0x1a0f00),
            Rgb::hex(0x4d2b00),
            Rgb::hex(0xb36b00),
            Rgb::hex(0xffb000),
            Rgb::hex(0xffd480),
        ],
    },
    Palette {
        name: "arcade",
        colors: &[
            Rgb::hex(0x0d0221),
            Rgb::hex(0x261447),
            Rgb::hex(0x2de2e6),
            Rgb::hex(0xf6019d),
            Rgb::hex(0xff6c11),
            Rgb::hex(0xf9c80e),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Rgb::hex(0xab5236);
        assert_eq!(c, Rgb::new(0xab, 0x52, 0x36));
        assert_eq!(c.to_hex_string(), "#ab5236");
    }

    #[test]
    fn test_darker_half() {
        let amber = PALETTES[6];
        assert_eq!(amber.darker_half(), vec![Rgb::hex(0x1a0f00), Rgb::hex(0x4d2b00)]);

        // cga: black, cyan, magenta, white sorted by luma
        let cga = PALETTES[3];
        assert_eq!(cga.darker_half(), vec![Rgb::hex(0x000000), Rgb::hex(0xff55ff)]);
    }

    #[test]
    fn test_every_palette_has_two_distinct_colours() {
        for p in PALETTES {
            assert!(p.colors.len() >= 4, "{} too small", p.name);
            let bg = p.colors[0];
            assert!(p.first_distinct_from(bg).is_some());
        }
    }

    #[test]
    fn test_mix_endpoints() {
        let a = Rgb::hex(0x102030);
        let b = Rgb::hex(0xf0e0d0);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
    }
}
