//! Pixel-art quantisation by block averaging.

use super::artifact::Artifact;
use super::palette::Rgb;

/// Replaces every `block` x `block` tile with its mean colour.
///
/// Tiles on the right and bottom edges may be smaller than `block`;
/// they average only the pixels they cover. Means are rounded half up
/// in integer arithmetic.
pub fn pixelate(source: &Artifact, block: u32) -> Artifact {
    let block = block.max(1);
    let (w, h) = (source.width(), source.height());
    let mut out = source.clone();

    let mut by = 0;
    while by < h {
        let bh = block.min(h - by);
        let mut bx = 0;
        while bx < w {
            let bw = block.min(w - bx);
            let mut sum = [0u32; 3];
            for y in by..by + bh {
                for x in bx..bx + bw {
                    if let Some(c) = source.get(x, y) {
                        sum[0] += u32::from(c.r);
                        sum[1] += u32::from(c.g);
                        sum[2] += u32::from(c.b);
                    }
                }
            }
            let count = bw * bh;
            let mean = |s: u32| ((s + count / 2) / count) as u8;
            let avg = Rgb::new(mean(sum[0]), mean(sum[1]), mean(sum[2]));
            out.fill_rect(
                i64::from(bx),
                i64::from(by),
                i64::from(bw),
                i64::from(bh),
                avg,
            );
            bx += block;
        }
        by += block;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_surface_unchanged() {
        let a = Artifact::filled(10, 10, Rgb::hex(0x336699));
        assert_eq!(pixelate(&a, 4), a);
    }

    #[test]
    fn test_block_mean() {
        let mut a = Artifact::filled(2, 2, Rgb::BLACK);
        a.set(0, 0, Rgb::new(255, 255, 255));
        a.set(1, 1, Rgb::new(255, 255, 255));
        let q = pixelate(&a, 2);
        // (510 + 2) / 4 = 128
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(q.get(x, y), Some(Rgb::new(128, 128, 128)));
        }
    }

    #[test]
    fn test_edge_tiles_average_only_covered_pixels() {
        let mut a = Artifact::filled(5, 1, Rgb::BLACK);
        a.set(4, 0, Rgb::WHITE);
        let q = pixelate(&a, 4);
        assert_eq!(q.get(0, 0), Some(Rgb::BLACK));
        assert_eq!(q.get(4, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn test_block_of_one_is_identity() {
        let mut a = Artifact::filled(3, 3, Rgb::BLACK);
        a.set(1, 2, Rgb::hex(0x123456));
        assert_eq!(pixelate(&a, 1), a);
    }
}
