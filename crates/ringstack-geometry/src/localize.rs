use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::{Point2, Rotation2, Vector2};
use ringstack_core::PixelBox;
use serde::{Deserialize, Serialize};

use crate::camera::CameraParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Mounting rotation between the robot heading and the camera's bearing zero.
const FIELD_ROTATION: f64 = 3.0 * FRAC_PI_2;

/// Wraps an angle into `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Pinhole range to an object `width_px` pixels wide, in inches.
pub fn camera_distance(params: &CameraParams, width_px: u32) -> Option<f64> {
    if width_px == 0 {
        return None;
    }
    let d = params.object_width() * params.focal_length_px / f64::from(width_px);
    d.is_finite().then_some(d)
}

/// Bearing of the box center in radians, `π/2` meaning straight ahead.
///
/// The lateral term runs along the frame's long axis (image y) and is zero at
/// the frame center; the forward term runs along image x.
pub fn camera_bearing(params: &CameraParams, bbox: &PixelBox) -> Option<f64> {
    if bbox.x_extent() == 0 || bbox.y_extent() == 0 {
        return None;
    }
    let frame_w = f64::from(params.frame.width);
    let frame_h = f64::from(params.frame.height);
    if frame_w <= 0.0 || frame_h <= 0.0 {
        return None;
    }
    let center_y = f64::from(bbox.y_extent()) / 2.0 + f64::from(bbox.min_y);
    let center_x = f64::from(bbox.x_extent()) / 2.0 + f64::from(bbox.min_x);
    let lateral = (center_y - frame_h / 2.0) / frame_h;
    let forward = center_x / frame_w;
    if lateral == 0.0 {
        return Some(FRAC_PI_2);
    }
    Some(forward.atan2(lateral))
}

/// Range and bearing measured from the camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraObservation {
    /// Inches.
    pub distance: f64,
    /// Radians.
    pub bearing: f64,
}

impl CameraObservation {
    pub fn from_bbox(params: &CameraParams, bbox: &PixelBox) -> Option<Self> {
        let distance = camera_distance(params, bbox.y_extent())?;
        let bearing = camera_bearing(params, bbox)?;
        Some(Self { distance, bearing })
    }

    pub fn bearing_degrees(&self) -> f64 {
        self.bearing.to_degrees()
    }

    /// Cartesian offset of the object from the camera.
    pub fn offset(&self) -> Vector2<f64> {
        Vector2::new(
            self.distance * self.bearing.cos(),
            self.distance * self.bearing.sin(),
        )
    }

    /// Object pose in the camera frame, heading equal to the bearing.
    pub fn relative_pose(&self) -> Pose2 {
        let offset = self.offset();
        Pose2::new(offset.x, offset.y, self.bearing)
    }
}

/// Range and bearing measured from the robot center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotObservation {
    pub distance: f64,
    pub bearing: f64,
}

impl RobotObservation {
    /// Shifts a camera observation to the robot center, `offset_front` inches
    /// behind the camera.
    ///
    /// The interior angle at the camera is `π/2 + b` below `π/2` and
    /// `3π/2 - b` from there on; both have cosine `-sin b`.
    pub fn from_camera(camera: &CameraObservation, offset_front: f64) -> Option<Self> {
        let d = camera.distance;
        let b = camera.bearing;
        if !(d.is_finite() && b.is_finite()) || d <= 0.0 {
            return None;
        }
        let interior = if b < FRAC_PI_2 {
            FRAC_PI_2 + b
        } else {
            3.0 * FRAC_PI_2 - b
        };
        let o = offset_front;
        let sq = o * o + d * d - 2.0 * o * d * interior.cos();
        let distance = sq.max(0.0).sqrt();
        let sine = (distance * (FRAC_PI_2 + b).sin() / d).clamp(-1.0, 1.0);
        Some(Self {
            distance,
            bearing: sine.asin(),
        })
    }

    pub fn bearing_degrees(&self) -> f64 {
        self.bearing.to_degrees()
    }
}

/// Planar pose: position in inches, heading in radians.
///
/// The frame depends on the producer: field coordinates for robot poses and
/// [`Pose2::locate`], camera coordinates for [`CameraObservation::relative_pose`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose2 {
    pub position: Point2<f64>,
    pub heading: f64,
}

impl Default for Pose2 {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Pose2 {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            heading,
        }
    }

    pub fn heading_degrees(&self) -> f64 {
        self.heading.to_degrees()
    }

    /// Places an object seen at `camera_bearing` and `robot_distance` on the
    /// field, with `self` as the robot pose.
    pub fn locate(&self, camera_bearing: f64, robot_distance: f64) -> Pose2 {
        let heading = normalize_angle(self.heading + FIELD_ROTATION + camera_bearing);
        let offset = Rotation2::new(heading) * Vector2::new(robot_distance, 0.0);
        Pose2 {
            position: self.position + offset,
            heading,
        }
    }
}

/// Camera and robot frame views of one detection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    pub camera: CameraObservation,
    pub robot: RobotObservation,
}

impl Localization {
    pub fn field(&self, robot_pose: &Pose2) -> Pose2 {
        robot_pose.locate(self.camera.bearing, self.robot.distance)
    }
}

/// Converts full-resolution bounding boxes into physical observations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Localizer {
    params: CameraParams,
}

impl Localizer {
    pub fn new(params: CameraParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    pub fn camera(&self, bbox: &PixelBox) -> Option<CameraObservation> {
        CameraObservation::from_bbox(&self.params, bbox)
    }

    pub fn robot(&self, camera: &CameraObservation) -> Option<RobotObservation> {
        RobotObservation::from_camera(camera, self.params.offset_front)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn localize(&self, bbox: &PixelBox) -> Option<Localization> {
        let camera = self.camera(bbox)?;
        let robot = self.robot(&camera)?;
        Some(Localization { camera, robot })
    }
}
