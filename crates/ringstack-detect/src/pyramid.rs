//! Gaussian pyramid decimation for color frames.
//!
//! Each level applies the separable 5-tap kernel `[1,4,6,4,1]/16` and keeps
//! every other row and column, giving `(w+1)/2 x (h+1)/2` pixels. Borders are
//! mirrored without repeating the edge pixel (`dcb|abcd|cba`). Arithmetic is
//! integer with a single rounding step per level.

use ringstack_core::{RgbImage, RgbImageView};

/// Number of halving passes applied before thresholding.
pub const DOWNSAMPLE_LEVELS: u32 = 2;

/// Linear scale between full-resolution and segmentation coordinates.
pub const DOWNSAMPLE_FACTOR: u32 = 1 << DOWNSAMPLE_LEVELS;

const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];

#[inline]
fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let mut i = i;
    while i < 0 || i >= n {
        i = if i < 0 { -i } else { 2 * (n - 1) - i };
    }
    i as usize
}

/// Blur and halve `src` once.
pub fn pyr_down(src: &RgbImageView<'_>) -> RgbImage {
    let (w, h) = (src.width, src.height);
    let (nw, nh) = ((w + 1) / 2, (h + 1) / 2);

    // Horizontal pass, evaluated only on the even columns that survive.
    let mut rows = vec![[0u32; 3]; nw * h];
    for y in 0..h {
        for ox in 0..nw {
            let cx = (2 * ox) as isize;
            let mut acc = [0u32; 3];
            for (k, &weight) in KERNEL.iter().enumerate() {
                let px = src.rgb(reflect101(cx + k as isize - 2, w), y);
                for c in 0..3 {
                    acc[c] += weight * px[c] as u32;
                }
            }
            rows[y * nw + ox] = acc;
        }
    }

    // Vertical pass on the even rows.
    let mut out = RgbImage::new(nw, nh);
    for oy in 0..nh {
        let cy = (2 * oy) as isize;
        for ox in 0..nw {
            let mut acc = [0u32; 3];
            for (k, &weight) in KERNEL.iter().enumerate() {
                let row = reflect101(cy + k as isize - 2, h);
                let partial = rows[row * nw + ox];
                for c in 0..3 {
                    acc[c] += weight * partial[c];
                }
            }
            out.set(
                ox,
                oy,
                [
                    ((acc[0] + 128) >> 8) as u8,
                    ((acc[1] + 128) >> 8) as u8,
                    ((acc[2] + 128) >> 8) as u8,
                ],
            );
        }
    }
    out
}

/// Size of the segmentation mask for a `width x height` frame.
pub fn downsampled_size(width: usize, height: usize) -> (usize, usize) {
    (0..DOWNSAMPLE_LEVELS).fold((width, height), |(w, h), _| ((w + 1) / 2, (h + 1) / 2))
}

/// Apply [`DOWNSAMPLE_LEVELS`] halving passes.
pub fn downsample(src: &RgbImageView<'_>) -> RgbImage {
    let mut level = pyr_down(src);
    for _ in 1..DOWNSAMPLE_LEVELS {
        level = pyr_down(&level.view());
    }
    level
}
