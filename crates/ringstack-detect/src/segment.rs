//! HSV color segmentation at reduced resolution.

use ringstack_core::{rgb_to_hsv_full, ColorRange, Mask, RgbImage, RgbImageView};

use crate::pyramid::downsample;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Mask plus the downsampled frame it was computed from.
#[derive(Clone, Debug)]
pub struct Segmentation {
    pub mask: Mask,
    pub image: RgbImage,
}

/// Threshold an already downsampled image against `range`.
pub fn threshold_hsv(image: &RgbImage, range: &ColorRange) -> Mask {
    let mut mask = Mask::new(image.width, image.height);
    for (dst, px) in mask.data.iter_mut().zip(image.data.chunks_exact(3)) {
        let hsv = rgb_to_hsv_full([px[0], px[1], px[2]]);
        *dst = u8::from(range.contains(hsv));
    }
    mask
}

/// Grow the mask with a 3x3 square element, `iterations` times.
///
/// Pixels outside the mask never contribute, so the border does not bleed in.
pub fn dilate3x3(mask: &Mask, iterations: u32) -> Mask {
    let mut cur = mask.clone();
    let (w, h) = (mask.width, mask.height);
    for _ in 0..iterations {
        let mut horiz = Mask::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let lo = x.saturating_sub(1);
                let hi = (x + 1).min(w - 1);
                horiz.set(x, y, (lo..=hi).any(|xx| cur.get(xx, y)));
            }
        }
        let mut next = Mask::new(w, h);
        for y in 0..h {
            let lo = y.saturating_sub(1);
            let hi = (y + 1).min(h - 1);
            for x in 0..w {
                next.set(x, y, (lo..=hi).any(|yy| horiz.get(x, yy)));
            }
        }
        cur = next;
    }
    cur
}

/// Downsample `frame`, threshold it in HSV and dilate the result.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(frame, range), fields(width = frame.width, height = frame.height))
)]
pub fn segment(frame: &RgbImageView<'_>, range: &ColorRange, dilate_iterations: u32) -> Segmentation {
    let image = downsample(frame);
    let raw = threshold_hsv(&image, range);
    let mask = if dilate_iterations > 0 {
        dilate3x3(&raw, dilate_iterations)
    } else {
        raw
    };
    Segmentation { mask, image }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringstack_core::Hsv;

    const ORANGE: [u8; 3] = [255, 128, 0];
    const BLUE: [u8; 3] = [20, 40, 200];

    #[test]
    fn mask_has_downsampled_dimensions_for_any_range() {
        let frame = RgbImage::from_fn(37, 23, |x, y| [(x * 7) as u8, (y * 11) as u8, 90]);
        let ranges = [
            ColorRange::RING,
            ColorRange::WOBBLE,
            ColorRange::new(Hsv::new(0, 0, 0), Hsv::new(255, 255, 255)).unwrap(),
            ColorRange::new(Hsv::new(40, 40, 40), Hsv::new(40, 40, 40)).unwrap(),
        ];
        for range in ranges {
            for iterations in 0..3 {
                let seg = segment(&frame.view(), &range, iterations);
                assert_eq!((seg.mask.width, seg.mask.height), (10, 6));
                assert_eq!(seg.mask.data.len(), 60);
            }
        }
    }

    #[test]
    fn full_range_selects_everything_and_empty_frame_nothing() {
        let frame = RgbImage::from_fn(16, 16, |_, _| BLUE);
        let all = ColorRange::new(Hsv::new(0, 0, 0), Hsv::new(255, 255, 255)).unwrap();
        assert_eq!(segment(&frame.view(), &all, 0).mask.count(), 16);
        assert_eq!(segment(&frame.view(), &ColorRange::RING, 1).mask.count(), 0);
    }

    #[test]
    fn orange_block_is_segmented() {
        let frame = RgbImage::from_fn(64, 64, |x, y| {
            if (16..48).contains(&x) && (16..48).contains(&y) {
                ORANGE
            } else {
                BLUE
            }
        });
        let seg = segment(&frame.view(), &ColorRange::RING, 0);
        assert!(seg.mask.get(8, 8));
        assert!(!seg.mask.get(0, 0));
        assert!(!seg.mask.get(15, 15));
    }

    #[test]
    fn dilation_grows_single_pixel_to_square() {
        let mut mask = Mask::new(5, 5);
        mask.set(2, 2, true);
        let grown = dilate3x3(&mask, 1);
        assert_eq!(grown.count(), 9);
        assert!(grown.get(1, 1) && grown.get(3, 3));
        assert!(!grown.get(0, 0));

        let mut corner = Mask::new(4, 4);
        corner.set(0, 0, true);
        assert_eq!(dilate3x3(&corner, 2).count(), 9);
    }
}
