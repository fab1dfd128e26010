//! Localization of a detected ring stack.
//!
//! Three nested frames:
//! - camera: pinhole range from the object's pixel width and a bearing from
//!   the box center,
//! - robot: the camera observation shifted to the robot center by the law of
//!   cosines,
//! - field: the robot observation rotated and translated by the robot pose.
//!
//! All functions are pure. Degenerate boxes yield `None` instead of NaN.

mod camera;
mod localize;

pub use camera::{CameraParams, MM_PER_INCH};
pub use localize::{
    camera_bearing, camera_distance, normalize_angle, CameraObservation, Localization, Localizer,
    Pose2, RobotObservation,
};
