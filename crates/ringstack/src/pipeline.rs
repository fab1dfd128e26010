use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, warn};
use ringstack_core::{
    AllowedRegion, ColorRange, FrameError, FrameSize, Mask, NudgeDirection, RegionEdge,
    RgbImageView,
};
use ringstack_detect::{downsampled_size, Classification, FrameAnalysis, ObjectDetector};
use ringstack_geometry::{CameraObservation, Localization, Localizer, Pose2, RobotObservation};

use crate::config::PipelineConfig;
use crate::store::{DetectionSnapshot, DetectionStore};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by [`VisionPipeline`].
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("frame is {got_width}x{got_height}, pipeline expects {expected_width}x{expected_height}")]
    ResolutionMismatch {
        expected_width: usize,
        expected_height: usize,
        got_width: usize,
        got_height: usize,
    },

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Frame-to-localization pipeline shared between a camera callback and a
/// control loop.
///
/// [`process_frame`](Self::process_frame) is the writer; every other method is
/// safe to call from any thread at any time. Color range and region edits
/// take effect on the next frame.
#[derive(Debug)]
pub struct VisionPipeline {
    frame: FrameSize,
    detector: ObjectDetector,
    localizer: Localizer,
    color: Mutex<ColorRange>,
    region: Mutex<AllowedRegion>,
    store: DetectionStore,
    frames: AtomicU64,
}

impl Default for VisionPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl VisionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let frame = config.camera.frame;
        let region = config.region.clamp_to(frame);
        if region != config.region {
            warn!("allowed region {} clamped to {}", config.region, region);
        }
        Self {
            frame,
            detector: ObjectDetector::new(config.detector),
            localizer: Localizer::new(config.camera),
            color: Mutex::new(config.color),
            region: Mutex::new(region),
            store: DetectionStore::new(),
            frames: AtomicU64::new(0),
        }
    }

    /// Wrap in an `Arc` for sharing between the frame callback and readers.
    pub fn shared(config: PipelineConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    pub fn frame_size(&self) -> FrameSize {
        self.frame
    }

    /// Current configuration, including runtime edits to color and region.
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            camera: self.localizer.params().clone(),
            detector: self.detector.params().clone(),
            color: self.color_range(),
            region: self.region(),
        }
    }

    /// Analyse one camera frame and publish the result.
    ///
    /// On error nothing is published and the previous snapshot stays visible.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn process_frame(
        &self,
        frame: &RgbImageView<'_>,
    ) -> Result<Classification, PipelineError> {
        self.check_resolution(frame.width, frame.height)?;
        let (color, region) = self.tunables();
        let analysis = self.detector.detect(frame, &color, &region);
        Ok(self.publish(analysis))
    }

    /// Like [`process_frame`](Self::process_frame) for a raw RGB or RGBA buffer.
    pub fn process_buffer(
        &self,
        width: usize,
        height: usize,
        channels: usize,
        data: &[u8],
    ) -> Result<Classification, PipelineError> {
        let frame = RgbImageView::new(width, height, channels, data)?;
        self.process_frame(&frame)
    }

    /// Like [`process_frame`](Self::process_frame) for an already thresholded
    /// mask at segmentation resolution.
    pub fn process_mask(&self, mask: &Mask) -> Result<Classification, PipelineError> {
        let (w, h) = downsampled_size(self.frame.width as usize, self.frame.height as usize);
        if (mask.width, mask.height) != (w, h) {
            return Err(PipelineError::ResolutionMismatch {
                expected_width: w,
                expected_height: h,
                got_width: mask.width,
                got_height: mask.height,
            });
        }
        let (_, region) = self.tunables();
        let analysis = self.detector.detect_in_mask(mask, &region);
        Ok(self.publish(analysis))
    }

    fn check_resolution(&self, width: usize, height: usize) -> Result<(), PipelineError> {
        let (ew, eh) = (self.frame.width as usize, self.frame.height as usize);
        if (width, height) != (ew, eh) {
            return Err(PipelineError::ResolutionMismatch {
                expected_width: ew,
                expected_height: eh,
                got_width: width,
                got_height: height,
            });
        }
        Ok(())
    }

    /// Copies of the color range and region taken once at frame start. Edits
    /// made while a frame is being analysed apply from the next frame on.
    fn tunables(&self) -> (ColorRange, AllowedRegion) {
        (self.color_range(), self.region())
    }

    fn publish(&self, analysis: FrameAnalysis) -> Classification {
        let frame_index = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        let classification = analysis.classification;
        debug!(
            "frame {} classification={:?} contours={}",
            frame_index, classification, analysis.contours_found
        );
        self.store.publish(DetectionSnapshot {
            frame_index,
            detection: analysis.detection,
            classification,
        });
        classification
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<DetectionSnapshot> {
        self.store.latest()
    }

    pub fn classification(&self) -> Classification {
        self.snapshot().classification
    }

    /// Camera and robot frame localization of the latest detection.
    pub fn localization(&self) -> Option<Localization> {
        let snap = self.snapshot();
        let detection = snap.detection.as_ref()?;
        self.localizer.localize(&detection.bbox)
    }

    pub fn camera_relative_position(&self) -> Option<CameraObservation> {
        let snap = self.snapshot();
        let detection = snap.detection.as_ref()?;
        self.localizer.camera(&detection.bbox)
    }

    pub fn robot_relative_position(&self) -> Option<RobotObservation> {
        self.localization().map(|loc| loc.robot)
    }

    /// Object pose on the field given the robot's current pose. Not cached.
    pub fn field_absolute_position(&self, robot_pose: &Pose2) -> Option<Pose2> {
        self.localization().map(|loc| loc.field(robot_pose))
    }

    /// Cartesian object pose in the camera frame.
    pub fn relative_object_pose(&self) -> Option<Pose2> {
        self.camera_relative_position().map(|obs| obs.relative_pose())
    }

    pub fn region(&self) -> AllowedRegion {
        *self.region.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the allowed region, clamped to the frame. Returns the stored value.
    pub fn set_region(&self, region: AllowedRegion) -> AllowedRegion {
        let clamped = region.clamp_to(self.frame);
        *self.region.lock().unwrap_or_else(PoisonError::into_inner) = clamped;
        clamped
    }

    /// Set one edge absolutely. Returns the stored region.
    pub fn set_region_edge(&self, edge: RegionEdge, value: i64) -> AllowedRegion {
        let mut guard = self.region.lock().unwrap_or_else(PoisonError::into_inner);
        guard.set_edge(edge, value, self.frame);
        *guard
    }

    /// Move one edge by a pixel. Returns the stored region.
    pub fn nudge(&self, edge: RegionEdge, direction: NudgeDirection) -> AllowedRegion {
        let mut guard = self.region.lock().unwrap_or_else(PoisonError::into_inner);
        guard.nudge(edge, direction, self.frame);
        *guard
    }

    pub fn color_range(&self) -> ColorRange {
        *self.color.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_color_range(&self, range: ColorRange) {
        *self.color.lock().unwrap_or_else(PoisonError::into_inner) = range;
    }

    /// One-line summary of the HSV range and allowed region for telemetry.
    pub fn bounds_summary(&self) -> String {
        let (color, region) = self.tunables();
        format!("hsv {color} | region {region}")
    }
}
