//! Fixed post-process applied after quantisation.
//!
//! Both passes use integer arithmetic only.

use super::artifact::Artifact;
use super::palette::Rgb;

/// Scanline rows keep 4/5 of their brightness.
const SCANLINE_KEEP: (u32, u32) = (4, 5);
/// Vignette darkening at the corners, in percent.
const VIGNETTE_STRENGTH_PCT: i64 = 35;

/// Darkens every odd row.
pub fn scanlines(artifact: &mut Artifact) {
    let (num, den) = SCANLINE_KEEP;
    artifact.map_pixels(|_, y, c| {
        if y % 2 == 1 {
            let s = |v: u8| (u32::from(v) * num / den) as u8;
            Rgb::new(s(c.r), s(c.g), s(c.b))
        } else {
            c
        }
    });
}

/// Darkens toward the edges in proportion to squared distance from
/// the centre, reaching full strength at the corners.
pub fn vignette(artifact: &mut Artifact) {
    let w = i64::from(artifact.width());
    let h = i64::from(artifact.height());
    // doubled coordinates keep the pixel-centre offset integral
    let max_r2 = w * w + h * h;
    if max_r2 == 0 {
        return;
    }
    let denom = max_r2 * 100;

    artifact.map_pixels(|x, y, c| {
        let dx = 2 * i64::from(x) + 1 - w;
        let dy = 2 * i64::from(y) + 1 - h;
        let keep = denom - VIGNETTE_STRENGTH_PCT * (dx * dx + dy * dy);
        let s = |v: u8| (i64::from(v) * keep / denom) as u8;
        Rgb::new(s(c.r), s(c.g), s(c.b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanlines_only_touch_odd_rows() {
        let mut a = Artifact::filled(2, 2, Rgb::new(100, 100, 100));
        scanlines(&mut a);
        assert_eq!(a.get(0, 0), Some(Rgb::new(100, 100, 100)));
        assert_eq!(a.get(0, 1), Some(Rgb::new(80, 80, 80)));
    }

    #[test]
    fn test_vignette_darkens_corners_more_than_centre() {
        let mut a = Artifact::filled(41, 41, Rgb::WHITE);
        vignette(&mut a);
        let centre = a.get(20, 20).unwrap();
        let corner = a.get(0, 0).unwrap();
        assert_eq!(centre, Rgb::WHITE);
        assert!(corner.r < centre.r);
        assert!(corner.r >= 165);
    }

    #[test]
    fn test_vignette_keeps_black() {
        let mut a = Artifact::filled(8, 8, Rgb::BLACK);
        vignette(&mut a);
        assert_eq!(a, Artifact::filled(8, 8, Rgb::BLACK));
    }
}
