//! Ring-stack detection from color frames.
//!
//! Pipeline:
//! - downsample the frame 4x with two Gaussian pyramid passes,
//! - threshold in HSV and dilate the mask,
//! - trace the outer border of every external mask component,
//! - keep the largest contour whose upscaled bounding box lies in the allowed region,
//! - classify its height/width ratio as one ring or a tall stack.
//!
//! Everything here is a pure function of the frame, color range and region;
//! sharing results between threads is the facade crate's concern.

pub mod classify;
pub mod contour;
pub mod pyramid;
pub mod segment;
pub mod select;

mod detector;
mod params;
mod result;

pub use classify::{Classification, ShapeClassifier, DEFAULT_MANY_RATIO_THRESHOLD};
pub use contour::{find_external_contours, Contour, ContourMap};
pub use detector::{FrameAnalysis, ObjectDetector};
pub use params::DetectorParams;
pub use pyramid::{downsampled_size, DOWNSAMPLE_FACTOR, DOWNSAMPLE_LEVELS};
pub use result::Detection;
pub use segment::{segment, Segmentation};
pub use select::select_largest;
