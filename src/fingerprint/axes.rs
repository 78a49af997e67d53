//! The seven style axes and their two value pools.
//!
//! Every axis is an enum whose variants form the unrestricted pool;
//! `ENFORCED` names the subset the gated mode may use.

use serde::{Deserialize, Serialize};

/// Common surface of a style axis.
pub trait StyleAxis: Copy + PartialEq + std::fmt::Debug + 'static {
    /// Axis name as it appears in stored fingerprints and logs.
    const AXIS: &'static str;

    /// Unrestricted pool.
    fn unrestricted() -> &'static [Self];

    /// Enforced pool.
    fn enforced() -> &'static [Self];

    fn as_str(self) -> &'static str;

    /// Parses a stored value; unknown strings yield `None`.
    fn parse(s: &str) -> Option<Self> {
        Self::unrestricted().iter().copied().find(|v| v.as_str() == s)
    }

    fn is_enforced(self) -> bool {
        Self::enforced().contains(&self)
    }
}

macro_rules! style_axis {
    (
        $(#[$meta:meta])*
        $name:ident, $axis:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
        enforced [$($enforced:ident),+ $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const ENFORCED: &'static [$name] = &[$($name::$enforced),+];
        }

        impl StyleAxis for $name {
            const AXIS: &'static str = $axis;

            fn unrestricted() -> &'static [Self] {
                Self::ALL
            }

            fn enforced() -> &'static [Self] {
                Self::ENFORCED
            }

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

style_axis! {
    /// Colour family.
    PaletteStyle, "palette" {
        Neon => "neon",
        Synthwave => "synthwave",
        Vaporwave => "vaporwave",
        Cyberpunk => "cyberpunk",
        Sunset => "sunset",
        Ocean => "ocean",
        Forest => "forest",
        Gameboy => "gameboy",
        Arcade => "arcade",
        Monochrome => "monochrome",
        Pastel => "pastel",
        Infrared => "infrared",
    }
    enforced [Neon, Synthwave, Vaporwave, Cyberpunk, Sunset, Ocean, Forest, Gameboy, Arcade]
}

style_axis! {
    GradientStyle, "gradient" {
        None => "none",
        Linear => "linear",
        Radial => "radial",
        Diagonal => "diagonal",
        Conic => "conic",
        Mesh => "mesh",
    }
    enforced [None, Linear, Radial, Diagonal, Conic]
}

style_axis! {
    GlowStyle, "glow" {
        None => "none",
        Soft => "soft",
        Neon => "neon",
        Pulse => "pulse",
    }
    enforced [None, Soft, Neon, Pulse]
}

style_axis! {
    ChromeStyle, "chrome" {
        None => "none",
        Silver => "silver",
        Gold => "gold",
        Holographic => "holographic",
    }
    enforced [None, Silver, Gold, Holographic]
}

style_axis! {
    BloomStyle, "bloom" {
        None => "none",
        Subtle => "subtle",
        Intense => "intense",
    }
    enforced [Subtle, Intense]
}

style_axis! {
    TextureStyle, "texture" {
        Clean => "clean",
        Scanline => "scanline",
        Grain => "grain",
        Crt => "crt",
    }
    enforced [Clean, Scanline, Grain, Crt]
}

style_axis! {
    /// Light placement.
    LightingStyle, "lighting" {
        Flat => "flat",
        Rim => "rim",
        Studio => "studio",
        Dramatic => "dramatic",
    }
    enforced [Flat, Rim, Studio, Dramatic]
}

/// Per-axis pool sizes, in axis order.
pub fn unrestricted_sizes() -> [usize; 7] {
    [
        PaletteStyle::ALL.len(),
        GradientStyle::ALL.len(),
        GlowStyle::ALL.len(),
        ChromeStyle::ALL.len(),
        BloomStyle::ALL.len(),
        TextureStyle::ALL.len(),
        LightingStyle::ALL.len(),
    ]
}

/// Per-axis enforced pool sizes, in axis order.
pub fn enforced_sizes() -> [usize; 7] {
    [
        PaletteStyle::ENFORCED.len(),
        GradientStyle::ENFORCED.len(),
        GlowStyle::ENFORCED.len(),
        ChromeStyle::ENFORCED.len(),
        BloomStyle::ENFORCED.len(),
        TextureStyle::ENFORCED.len(),
        LightingStyle::ENFORCED.len(),
    ]
}

/// Number of distinct unrestricted fingerprints.
pub fn unrestricted_combinations() -> usize {
    unrestricted_sizes().iter().product()
}

/// Number of distinct enforced fingerprints.
pub fn enforced_combinations() -> usize {
    enforced_sizes().iter().product()
}
