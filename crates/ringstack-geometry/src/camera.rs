use ringstack_core::FrameSize;
use serde::{Deserialize, Serialize};

pub const MM_PER_INCH: f64 = 25.4;

/// Mounting and optics of the detection camera.
///
/// Distances come out in inches. The stream is rotated sideways, so the
/// frame's long axis (`frame.height`) runs left to right across the robot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    pub frame: FrameSize,
    /// Focal length in full-resolution pixels.
    pub focal_length_px: f64,
    /// Camera distance ahead of the robot center, in inches.
    pub offset_front: f64,
    /// Physical width of the tracked object, in millimetres.
    pub object_width_mm: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            frame: FrameSize::new(1080, 1920),
            focal_length_px: 1500.0,
            offset_front: 6.5,
            object_width_mm: 127.0,
        }
    }
}

impl CameraParams {
    /// Object width in inches.
    pub fn object_width(&self) -> f64 {
        self.object_width_mm / MM_PER_INCH
    }
}
