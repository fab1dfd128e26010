use log::debug;
use nalgebra::Point2;
use ringstack_core::{AllowedRegion, ColorRange, Mask, RgbImage, RgbImageView};

use crate::classify::{Classification, ShapeClassifier};
use crate::contour::{find_external_contours, Contour, ContourMap};
use crate::params::DetectorParams;
use crate::pyramid::DOWNSAMPLE_FACTOR;
use crate::result::Detection;
use crate::segment::segment;
use crate::select::select_largest;

#[cfg(feature = "tracing")]
use tracing::instrument;

const SCALE: i32 = DOWNSAMPLE_FACTOR as i32;

/// Outcome of analysing one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameAnalysis {
    pub detection: Option<Detection>,
    pub classification: Classification,
    /// External contours found before region filtering.
    pub contours_found: usize,
}

/// Segments a frame, selects the largest in-region contour and classifies it.
///
/// The detector itself is immutable; color range and region are supplied per
/// call so a tuning interface can change them between frames.
#[derive(Clone, Debug)]
pub struct ObjectDetector {
    params: DetectorParams,
    classifier: ShapeClassifier,
}

impl ObjectDetector {
    pub fn new(params: DetectorParams) -> Self {
        let classifier = ShapeClassifier::new(params.many_ratio_threshold);
        Self { params, classifier }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn classifier(&self) -> &ShapeClassifier {
        &self.classifier
    }

    /// Full pipeline on a color frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, color, region), fields(width = frame.width, height = frame.height))
    )]
    pub fn detect(
        &self,
        frame: &RgbImageView<'_>,
        color: &ColorRange,
        region: &AllowedRegion,
    ) -> FrameAnalysis {
        let seg = segment(frame, color, self.params.dilate_iterations);
        self.analyze(&seg.mask, Some(&seg.image), region)
    }

    /// Contour selection and classification on an already segmented mask.
    ///
    /// `mask` is in downsampled coordinates; reported boxes are scaled up.
    pub fn detect_in_mask(&self, mask: &Mask, region: &AllowedRegion) -> FrameAnalysis {
        self.analyze(mask, None, region)
    }

    fn analyze(
        &self,
        mask: &Mask,
        image: Option<&RgbImage>,
        region: &AllowedRegion,
    ) -> FrameAnalysis {
        let map = find_external_contours(mask);
        let detection = select_largest(&map.contours, region, DOWNSAMPLE_FACTOR).map(|c| {
            Detection {
                bbox: c.bbox.scaled(DOWNSAMPLE_FACTOR),
                area: c.area,
                contour: c
                    .points
                    .iter()
                    .map(|p| Point2::new(p.x * SCALE, p.y * SCALE))
                    .collect(),
                mean_color: image.and_then(|img| mean_color(img, &map, c)),
            }
        });
        let classification = self.classifier.classify(detection.as_ref());
        debug!(
            "contours={} selected_area={:?} classification={:?}",
            map.contours.len(),
            detection.as_ref().map(|d| d.area),
            classification
        );
        FrameAnalysis {
            detection,
            classification,
            contours_found: map.contours.len(),
        }
    }
}

/// Mean RGB of the pixels labelled as `contour`'s component.
fn mean_color(image: &RgbImage, map: &ContourMap, contour: &Contour) -> Option<[f32; 3]> {
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    let b = contour.bbox;
    for y in b.min_y as usize..(b.max_y as usize).min(map.height) {
        for x in b.min_x as usize..(b.max_x as usize).min(map.width) {
            if map.label_at(x, y) != contour.label {
                continue;
            }
            let px = image.get(x, y);
            for c in 0..3 {
                sum[c] += u64::from(px[c]);
            }
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    let n = count as f32;
    Some([sum[0] as f32 / n, sum[1] as f32 / n, sum[2] as f32 / n])
}
