//! Ring-stack vision for a competition robot.
//!
//! This crate provides:
//! - re-exports of the `ringstack-*` crates,
//! - [`VisionPipeline`], which runs detection once per camera frame and
//!   publishes an immutable [`DetectionSnapshot`] that a control loop on
//!   another thread can poll,
//! - JSON configuration ([`PipelineConfig`]),
//! - (feature `image`) adapters from `image` buffers.
//!
//! ## Quickstart
//!
//! ```no_run
//! use ringstack::{PipelineConfig, Pose2, VisionPipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = VisionPipeline::shared(PipelineConfig::default());
//! let frame = image::open("frame.png")?;
//! let class = ringstack::frame::process_image(&pipeline, &frame)?;
//! println!("rings: {:?}", class.ring_count());
//! if let Some(pose) = pipeline.field_absolute_position(&Pose2::new(0.0, 0.0, 0.0)) {
//!     println!("stack at {:?}", pose.position);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `ringstack::core`: frames, masks, HSV ranges, the allowed region, logging.
//! - `ringstack::detect`: segmentation, contours, selection, classification.
//! - `ringstack::geometry`: camera, robot and field frame localization.
//! - `ringstack::frame` (feature `image`): `image` crate adapters.

pub use ringstack_core as core;
pub use ringstack_detect as detect;
pub use ringstack_geometry as geometry;

pub use ringstack_core::{AllowedRegion, ColorRange, Hsv, NudgeDirection, RegionEdge};
pub use ringstack_detect::{Classification, Detection, DetectorParams};
pub use ringstack_geometry::{
    CameraObservation, CameraParams, Localization, Pose2, RobotObservation,
};

mod config;
mod pipeline;
mod store;

pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{PipelineError, VisionPipeline};
pub use store::{DetectionSnapshot, DetectionStore};

#[cfg(feature = "image")]
pub mod frame;
