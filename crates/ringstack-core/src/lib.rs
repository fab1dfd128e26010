//! Core types for ring-stack detection.
//!
//! This crate holds the plain data the rest of the workspace shares: borrowed
//! color frames, binary masks, HSV ranges and the allowed-region rectangle. It
//! does no image processing beyond per-pixel color conversion.

mod color;
mod image;
mod logger;
mod region;

pub use color::{rgb_to_hsv_full, ColorRange, ColorRangeError, Hsv, HsvChannel};
pub use image::{FrameError, Mask, RgbImage, RgbImageView};
pub use region::{AllowedRegion, FrameSize, NudgeDirection, PixelBox, RegionEdge, RegionRect};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, level_from_env};
