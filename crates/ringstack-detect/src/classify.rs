//! Stack-size classification from bounding-box shape.

use serde::{Deserialize, Serialize};

use crate::result::Detection;

/// Height/width ratio above which a stack counts as [`Classification::Many`].
pub const DEFAULT_MANY_RATIO_THRESHOLD: f64 = 0.4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// No frame processed yet.
    #[default]
    Unknown,
    /// Frame processed, no qualifying object: the "none" outcome, zero rings.
    /// Serialized as `"empty"`.
    Empty,
    /// A single flat ring.
    One,
    /// A tall stack (four rings on the game field).
    Many,
}

impl Classification {
    /// True when an object was seen in the last processed frame.
    pub fn sees_object(self) -> bool {
        matches!(self, Classification::One | Classification::Many)
    }

    /// Ring count on the game field, if the frame has been classified.
    pub fn ring_count(self) -> Option<u8> {
        match self {
            Classification::Unknown => None,
            Classification::Empty => Some(0),
            Classification::One => Some(1),
            Classification::Many => Some(4),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeClassifier {
    /// Strict threshold: ratios above it classify as `Many`.
    pub many_ratio_threshold: f64,
}

impl Default for ShapeClassifier {
    fn default() -> Self {
        Self {
            many_ratio_threshold: DEFAULT_MANY_RATIO_THRESHOLD,
        }
    }
}

impl ShapeClassifier {
    pub fn new(many_ratio_threshold: f64) -> Self {
        Self {
            many_ratio_threshold,
        }
    }

    pub fn classify_ratio(&self, ratio: f64) -> Classification {
        if ratio > self.many_ratio_threshold {
            Classification::Many
        } else {
            Classification::One
        }
    }

    /// Classify the selected contour of one frame; `None` means nothing qualified.
    pub fn classify(&self, detection: Option<&Detection>) -> Classification {
        match detection.filter(|d| d.area > 0.0) {
            Some(det) => det
                .height_width_ratio()
                .map_or(Classification::Empty, |ratio| self.classify_ratio(ratio)),
            None => Classification::Empty,
        }
    }
}
