//! Largest-contour selection inside the allowed region.

use ringstack_core::AllowedRegion;

use crate::contour::Contour;

/// Pick the contour with the largest positive area whose bounding box, scaled
/// by `scale` to full resolution, lies inside `region`.
///
/// Ties keep the contour discovered first.
pub fn select_largest<'a>(
    contours: &'a [Contour],
    region: &AllowedRegion,
    scale: u32,
) -> Option<&'a Contour> {
    let mut best: Option<&Contour> = None;
    let mut best_area = 0.0;
    for contour in contours {
        if contour.area <= best_area {
            continue;
        }
        if !region.contains_box(&contour.bbox.scaled(scale)) {
            continue;
        }
        best_area = contour.area;
        best = Some(contour);
    }
    best
}
