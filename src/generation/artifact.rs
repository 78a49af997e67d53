//! Rendered RGB surface.

use super::palette::Rgb;
use sha2::{Digest, Sha256};

/// A rendered logo: packed RGB, row-major, three bytes per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Artifact {
    /// Creates a surface filled with `fill`.
    pub fn filled(width: u32, height: u32, fill: Rgb) -> Self {
        let count = (width as usize) * (height as usize);
        let mut pixels = Vec::with_capacity(count * 3);
        for _ in 0..count {
            pixels.extend_from_slice(&[fill.r, fill.g, fill.b]);
        }
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Validates that the buffer size matches the dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.pixel_count() * 3
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 3
    }

    /// Reads a pixel. Out-of-bounds reads return `None`.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Rgb::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Writes a pixel. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, c: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.pixels[i] = c.r;
        self.pixels[i + 1] = c.g;
        self.pixels[i + 2] = c.b;
    }

    /// Signed-coordinate write, clipped to the surface.
    pub fn plot(&mut self, x: i64, y: i64, c: Rgb) {
        if x < 0 || y < 0 {
            return;
        }
        self.set(x as u32, y as u32, c);
    }

    /// Fills an axis-aligned rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, c: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(i64::from(self.width));
        let y1 = (y + h).min(i64::from(self.height));
        for py in y0..y1 {
            for px in x0..x1 {
                self.set(px as u32, py as u32, c);
            }
        }
    }

    /// Applies `f` to every pixel along with its coordinates.
    pub fn map_pixels(&mut self, mut f: impl FnMut(u32, u32, Rgb) -> Rgb) {
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(c) = self.get(x, y) {
                    self.set(x, y, f(x, y, c));
                }
            }
        }
    }

    /// SHA-256 over the dimensions and pixel bytes, lowercase hex.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.pixels);
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}
