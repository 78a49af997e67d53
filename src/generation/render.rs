//! Text layout and layered drawing onto the full-resolution canvas.
//!
//! Layers, bottom to top: background, border, drop shadow, glow halo,
//! text. Everything here is integer geometry plus `Rgb::mix`, so the
//! output depends only on the inputs.

use super::artifact::Artifact;
use super::config::{BorderStyle, GenerationConfig};
use super::font::{self, GLYPH_ADVANCE, GLYPH_HEIGHT};
use super::palette::Rgb;

/// Largest glow radius in canvas pixels.
const MAX_GLOW_RADIUS: u32 = 6;

/// Lit/unlit coverage of the laid-out text.
pub struct TextMask {
    width: u32,
    height: u32,
    lit: Vec<bool>,
    /// Canvas pixels per font cell.
    pub scale: u32,
}

impl TextMask {
    /// Lays `text` out centred on a `width` x `height` canvas.
    ///
    /// The integer scale is the largest that keeps the text within 85% of
    /// the width and 50% of the height, and never below 1.
    pub fn layout(text: &str, width: u32, height: u32) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cells_w = font::line_width(chars.len()).max(1);
        let scale = ((width * 85 / 100) / cells_w)
            .min((height / 2) / GLYPH_HEIGHT)
            .max(1);

        let text_w = i64::from(cells_w * scale);
        let text_h = i64::from(GLYPH_HEIGHT * scale);
        let x0 = (i64::from(width) - text_w) / 2;
        let y0 = (i64::from(height) - text_h) / 2;

        let mut lit = vec![false; (width as usize) * (height as usize)];
        for (i, ch) in chars.iter().enumerate() {
            let gx = x0 + i64::from(i as u32 * GLYPH_ADVANCE * scale);
            for row in 0..GLYPH_HEIGHT {
                for col in 0..font::GLYPH_WIDTH {
                    if !font::is_lit(*ch, col, row) {
                        continue;
                    }
                    let cx = gx + i64::from(col * scale);
                    let cy = y0 + i64::from(row * scale);
                    for dy in 0..i64::from(scale) {
                        for dx in 0..i64::from(scale) {
                            let (px, py) = (cx + dx, cy + dy);
                            if px >= 0 && py >= 0 && px < i64::from(width) && py < i64::from(height) {
                                lit[py as usize * width as usize + px as usize] = true;
                            }
                        }
                    }
                }
            }
        }

        Self {
            width,
            height,
            lit,
            scale,
        }
    }

    /// Coverage at signed coordinates; outside the canvas is unlit.
    #[inline]
    pub fn is_lit(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        self.lit[y as usize * self.width as usize + x as usize]
    }

    /// Number of lit pixels.
    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|&&l| l).count()
    }

    /// Chebyshev distance from every pixel to the nearest lit pixel,
    /// capped at `radius + 1`.
    fn distance_map(&self, radius: u32) -> Vec<u32> {
        let (w, h) = (self.width as usize, self.height as usize);
        let cap = radius + 1;

        // horizontal pass: distance to nearest lit pixel in the same row
        let mut horiz = vec![cap; w * h];
        for y in 0..h {
            let row = &self.lit[y * w..(y + 1) * w];
            let mut last: Option<usize> = None;
            for x in 0..w {
                if row[x] {
                    last = Some(x);
                }
                if let Some(l) = last {
                    horiz[y * w + x] = ((x - l) as u32).min(cap);
                }
            }
            last = None;
            for x in (0..w).rev() {
                if row[x] {
                    last = Some(x);
                }
                if let Some(l) = last {
                    let d = ((l - x) as u32).min(cap);
                    if d < horiz[y * w + x] {
                        horiz[y * w + x] = d;
                    }
                }
            }
        }

        // vertical pass: max(|dy|, horizontal distance) minimised over the window
        let mut dist = vec![cap; w * h];
        let r = radius as i64;
        for y in 0..h as i64 {
            for x in 0..w {
                let mut best = cap;
                for dy in -r..=r {
                    let yy = y + dy;
                    if yy < 0 || yy >= h as i64 {
                        continue;
                    }
                    let d = horiz[yy as usize * w + x].max(dy.unsigned_abs() as u32);
                    best = best.min(d);
                }
                dist[y as usize * w + x] = best;
            }
        }
        dist
    }
}

/// Border thickness for a canvas.
fn border_thickness(width: u32, height: u32) -> u32 {
    (width.min(height) / 32).max(2)
}

fn draw_border(canvas: &mut Artifact, style: BorderStyle, color: Rgb) {
    let (w, h) = (canvas.width(), canvas.height());
    let t = border_thickness(w, h);
    let (wi, hi, ti) = (i64::from(w), i64::from(h), i64::from(t));

    let frame = |canvas: &mut Artifact, inset: i64, thick: i64, c: Rgb| {
        canvas.fill_rect(inset, inset, wi - 2 * inset, thick, c);
        canvas.fill_rect(inset, hi - inset - thick, wi - 2 * inset, thick, c);
        canvas.fill_rect(inset, inset, thick, hi - 2 * inset, c);
        canvas.fill_rect(wi - inset - thick, inset, thick, hi - 2 * inset, c);
    };

    match style {
        BorderStyle::Solid => frame(canvas, 0, ti, color),
        BorderStyle::Double => {
            let thin = (ti / 2).max(1);
            frame(canvas, 0, thin, color);
            frame(canvas, thin + ti, thin, color);
        }
        BorderStyle::Dashed | BorderStyle::Dotted => {
            let (period, on) = match style {
                BorderStyle::Dashed => (4 * ti, 3 * ti),
                _ => (2 * ti, ti),
            };
            for y in 0..hi {
                for x in 0..wi {
                    let on_edge_h = y < ti || y >= hi - ti;
                    let on_edge_v = x < ti || x >= wi - ti;
                    let draw = (on_edge_h && x % period < on) || (on_edge_v && y % period < on);
                    if draw {
                        canvas.plot(x, y, color);
                    }
                }
            }
        }
        BorderStyle::Beveled => {
            let light = color.mix(Rgb::WHITE, 0.4);
            let dark = color.scale(0.5);
            canvas.fill_rect(0, hi - ti, wi, ti, dark);
            canvas.fill_rect(wi - ti, 0, ti, hi, dark);
            canvas.fill_rect(0, 0, wi, ti, light);
            canvas.fill_rect(0, 0, ti, hi, light);
        }
    }
}

/// Draws every layer for `text` onto a fresh canvas.
pub fn render_layers(text: &str, config: &GenerationConfig, width: u32, height: u32) -> Artifact {
    let mut canvas = Artifact::filled(width, height, config.background_color);
    draw_border(&mut canvas, config.border_style, config.text_color);

    let mask = TextMask::layout(text, width, height);

    let offset = i64::from((mask.scale / 2).max(1));
    let shadow = config
        .background_color
        .mix(config.shadow_color, config.shadow_intensity);
    canvas.map_pixels(|x, y, c| {
        if mask.is_lit(i64::from(x) - offset, i64::from(y) - offset) {
            shadow
        } else {
            c
        }
    });

    if config.glow_intensity > 0.0 {
        let radius = (mask.scale / 2).clamp(1, MAX_GLOW_RADIUS);
        let dist = mask.distance_map(radius);
        let glow = config.glow_color();
        canvas.map_pixels(|x, y, c| {
            let d = dist[y as usize * width as usize + x as usize];
            if d == 0 || d > radius {
                return c;
            }
            let falloff = f64::from(radius + 1 - d) / f64::from(radius + 1);
            c.mix(glow, config.glow_intensity * falloff)
        });
    }

    canvas.map_pixels(|x, y, c| {
        if mask.is_lit(i64::from(x), i64::from(y)) {
            config.text_color
        } else {
            c
        }
    });

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_centred_and_scaled() {
        let mask = TextMask::layout("I", 100, 100);
        // 85 / 5 = 17, 50 / 7 = 7
        assert_eq!(mask.scale, 7);
        assert!(mask.lit_count() > 0);
        assert!(!mask.is_lit(0, 0));
        assert!(mask.is_lit(50, 50));
    }

    #[test]
    fn test_long_text_never_below_scale_one() {
        let text = "W".repeat(30);
        let mask = TextMask::layout(&text, 64, 32);
        assert_eq!(mask.scale, 1);
    }

    #[test]
    fn test_distance_map_is_chebyshev() {
        let mask = TextMask::layout(".", 40, 40);
        let dist = mask.distance_map(3);
        let lit: Vec<usize> = (0..1600).filter(|&i| dist[i] == 0).collect();
        assert_eq!(lit.len(), mask.lit_count());
        assert!(dist.iter().all(|&d| d <= 4));
    }

    #[test]
    fn test_border_paints_corners() {
        let mut canvas = Artifact::filled(64, 64, Rgb::BLACK);
        draw_border(&mut canvas, BorderStyle::Solid, Rgb::WHITE);
        assert_eq!(canvas.get(0, 0), Some(Rgb::WHITE));
        assert_eq!(canvas.get(63, 63), Some(Rgb::WHITE));
        assert_eq!(canvas.get(32, 32), Some(Rgb::BLACK));
    }
}
