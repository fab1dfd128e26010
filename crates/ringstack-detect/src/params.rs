use serde::{Deserialize, Serialize};

use crate::classify::DEFAULT_MANY_RATIO_THRESHOLD;

/// Tunables for [`crate::ObjectDetector`].
///
/// Color range and allowed region are not part of this struct: they change at
/// runtime and are passed per frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// 3x3 dilation passes applied to the color mask before contour search.
    pub dilate_iterations: u32,
    /// Height/width ratio above which a stack classifies as `Many`.
    pub many_ratio_threshold: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            dilate_iterations: 1,
            many_ratio_threshold: DEFAULT_MANY_RATIO_THRESHOLD,
        }
    }
}
