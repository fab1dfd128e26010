//! Adapters from `image` buffers to pipeline frames.

use ringstack_core::RgbImageView;
use ringstack_detect::Classification;

use crate::pipeline::{PipelineError, VisionPipeline};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Borrow an `image::RgbImage` as a frame.
pub fn rgb_view(img: &::image::RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 3,
        data: img.as_raw(),
    }
}

/// Borrow an `image::RgbaImage` as a frame; alpha is ignored.
pub fn rgba_view(img: &::image::RgbaImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 4,
        data: img.as_raw(),
    }
}

/// Run `pipeline` on a decoded image of any pixel format.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(pipeline, img), fields(width = img.width(), height = img.height()))
)]
pub fn process_image(
    pipeline: &VisionPipeline,
    img: &::image::DynamicImage,
) -> Result<Classification, PipelineError> {
    match img {
        ::image::DynamicImage::ImageRgb8(rgb) => pipeline.process_frame(&rgb_view(rgb)),
        ::image::DynamicImage::ImageRgba8(rgba) => pipeline.process_frame(&rgba_view(rgba)),
        other => pipeline.process_frame(&rgb_view(&other.to_rgb8())),
    }
}
