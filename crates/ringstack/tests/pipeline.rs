use std::f64::consts::FRAC_PI_2;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ringstack::core::{FrameSize, Mask, RgbImage};
use ringstack::{
    AllowedRegion, Classification, ColorRange, Hsv, NudgeDirection, PipelineConfig, Pose2,
    RegionEdge, VisionPipeline,
};

const ORANGE: [u8; 3] = [255, 128, 0];
const BLUE: [u8; 3] = [20, 40, 200];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Mask at segmentation resolution for the default 1080x1920 frame.
fn mask_with(rect: Option<(usize, usize, usize, usize)>) -> Mask {
    let mut mask = Mask::new(270, 480);
    if let Some((x0, y0, x1, y1)) = rect {
        mask.fill_rect(x0, y0, x1, y1);
    }
    mask
}

fn frame_with_block(x0: usize, y0: usize, x1: usize, y1: usize) -> RgbImage {
    RgbImage::from_fn(1080, 1920, |x, y| {
        if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
            ORANGE
        } else {
            BLUE
        }
    })
}

#[test]
fn square_contour_is_many() {
    init_logger();
    let pipeline = VisionPipeline::default();
    let class = pipeline.process_mask(&mask_with(Some((10, 100, 60, 150)))).unwrap();
    assert_eq!(class, Classification::Many);

    let snap = pipeline.snapshot();
    assert_eq!(snap.frame_index, 1);
    assert_eq!(snap.classification, Classification::Many);
    let det = snap.detection.as_ref().unwrap();
    assert_eq!((det.bbox.min_x, det.bbox.max_x), (40, 240));
    assert_eq!((det.bbox.min_y, det.bbox.max_y), (400, 600));
    assert_relative_eq!(snap.height_width_ratio().unwrap(), 1.0);
}

#[test]
fn wide_short_contour_is_one() {
    let pipeline = VisionPipeline::default();
    let class = pipeline.process_mask(&mask_with(Some((20, 200, 30, 250)))).unwrap();
    assert_eq!(class, Classification::One);
    assert_relative_eq!(pipeline.snapshot().height_width_ratio().unwrap(), 0.2);
}

#[test]
fn empty_mask_is_empty_and_geometry_unavailable() {
    let pipeline = VisionPipeline::default();
    assert_eq!(pipeline.process_mask(&mask_with(None)).unwrap(), Classification::Empty);
    assert!(pipeline.snapshot().detection.is_none());
    assert!(pipeline.camera_relative_position().is_none());
    assert!(pipeline.robot_relative_position().is_none());
    assert!(pipeline.field_absolute_position(&Pose2::default()).is_none());
}

#[test]
fn contour_outside_region_counts_as_empty() {
    let pipeline = VisionPipeline::default();
    // x 600..800 at full resolution, beyond the default max_x of 480.
    let class = pipeline.process_mask(&mask_with(Some((150, 100, 200, 150)))).unwrap();
    assert_eq!(class, Classification::Empty);
    assert!(pipeline.camera_relative_position().is_none());
}

#[test]
fn box_centered_on_long_axis_bears_straight_ahead() {
    let pipeline = VisionPipeline::default();
    // y 860..1060 at full resolution, centered on 960.
    pipeline.process_mask(&mask_with(Some((20, 215, 40, 265)))).unwrap();
    let cam = pipeline.camera_relative_position().unwrap();
    assert_eq!(cam.bearing, FRAC_PI_2);
    assert_relative_eq!(cam.bearing_degrees(), 90.0);
    // 5 in * 1500 px / 200 px.
    assert_relative_eq!(cam.distance, 37.5, epsilon = 1e-12);

    let robot = pipeline.robot_relative_position().unwrap();
    assert_relative_eq!(robot.distance, 44.0, epsilon = 1e-9);
}

#[test]
fn field_position_at_origin_matches_hand_computation() {
    let pipeline = VisionPipeline::default();
    pipeline.process_mask(&mask_with(Some((30, 60, 70, 160)))).unwrap();
    let cam = pipeline.camera_relative_position().unwrap();
    let field = pipeline.field_absolute_position(&Pose2::new(0.0, 0.0, 0.0)).unwrap();

    let (d, b, o) = (cam.distance, cam.bearing, 6.5);
    let r = (o * o + d * d + 2.0 * o * d * b.sin()).sqrt();
    assert_abs_diff_eq!(field.position.x, r * b.sin(), epsilon = 1e-6);
    assert_abs_diff_eq!(field.position.y, -r * b.cos(), epsilon = 1e-6);
    assert_abs_diff_eq!(field.heading, b - FRAC_PI_2, epsilon = 1e-9);

    let moved = pipeline
        .field_absolute_position(&Pose2::new(12.0, -3.0, 0.0))
        .unwrap();
    assert_abs_diff_eq!(moved.position.x - field.position.x, 12.0, epsilon = 1e-9);
    assert_abs_diff_eq!(moved.position.y - field.position.y, -3.0, epsilon = 1e-9);
}

#[test]
fn relative_pose_is_cartesian_camera_observation() {
    let pipeline = VisionPipeline::default();
    pipeline.process_mask(&mask_with(Some((30, 60, 70, 160)))).unwrap();
    let cam = pipeline.camera_relative_position().unwrap();
    let pose = pipeline.relative_object_pose().unwrap();
    assert_relative_eq!(pose.position.x, cam.distance * cam.bearing.cos(), epsilon = 1e-12);
    assert_relative_eq!(pose.position.y, cam.distance * cam.bearing.sin(), epsilon = 1e-12);
    assert_eq!(pose.heading, cam.bearing);
}

#[test]
fn color_frame_tall_block_is_many() {
    init_logger();
    let pipeline = VisionPipeline::default();
    let frame = frame_with_block(100, 800, 300, 1200);
    let class = pipeline.process_frame(&frame.view()).unwrap();
    assert_eq!(class, Classification::Many);

    let det = pipeline.snapshot().detection.clone().unwrap();
    assert!(det.bbox.min_x <= 100 && det.bbox.max_x >= 300, "{:?}", det.bbox);
    assert!(det.bbox.min_y <= 800 && det.bbox.max_y >= 1200, "{:?}", det.bbox);
    let mean = det.mean_color.unwrap();
    assert!(mean[0] > mean[2], "{mean:?}");
}

#[test]
fn color_frame_flat_block_is_one() {
    let pipeline = VisionPipeline::default();
    let frame = frame_with_block(100, 700, 160, 1200);
    assert_eq!(
        pipeline.process_frame(&frame.view()).unwrap(),
        Classification::One
    );
}

#[test]
fn rgba_buffer_is_accepted() {
    let pipeline = VisionPipeline::default();
    let rgb = frame_with_block(100, 800, 300, 1200);
    let rgba: Vec<u8> = rgb
        .data
        .chunks_exact(3)
        .flat_map(|px| [px[0], px[1], px[2], 255])
        .collect();
    let class = pipeline.process_buffer(1080, 1920, 4, &rgba).unwrap();
    assert_eq!(class, Classification::Many);
}

#[test]
fn region_change_applies_to_next_frame() {
    let pipeline = VisionPipeline::default();
    let frame = frame_with_block(100, 800, 300, 1200);
    assert_eq!(
        pipeline.process_frame(&frame.view()).unwrap(),
        Classification::Many
    );

    pipeline.set_region_edge(RegionEdge::MaxX, 50);
    assert_eq!(
        pipeline.process_frame(&frame.view()).unwrap(),
        Classification::Empty
    );
    assert_eq!(pipeline.snapshot().frame_index, 2);

    for _ in 0..300 {
        pipeline.nudge(RegionEdge::MaxX, NudgeDirection::Increase);
    }
    assert_eq!(pipeline.region().max_x(), 350);
    assert_eq!(
        pipeline.process_frame(&frame.view()).unwrap(),
        Classification::Many
    );
}

#[test]
fn color_range_change_applies_to_next_frame() {
    let pipeline = VisionPipeline::default();
    let frame = frame_with_block(100, 800, 300, 1200);
    // Green hues: neither the block, the background nor their blend.
    let green = ColorRange::new(Hsv::new(90, 50, 50), Hsv::new(110, 255, 255)).unwrap();
    pipeline.set_color_range(green);
    assert_eq!(
        pipeline.process_frame(&frame.view()).unwrap(),
        Classification::Empty
    );
    pipeline.set_color_range(ColorRange::RING);
    assert_eq!(
        pipeline.process_frame(&frame.view()).unwrap(),
        Classification::Many
    );
}

#[test]
fn small_configured_frame_round_trips() {
    let frame = FrameSize::new(108, 192);
    let mut config = PipelineConfig::default();
    config.camera.frame = frame;
    config.region = AllowedRegion::full(frame);
    let pipeline = VisionPipeline::new(config);

    let img = RgbImage::from_fn(108, 192, |x, y| {
        if (20..60).contains(&x) && (40..120).contains(&y) {
            ORANGE
        } else {
            BLUE
        }
    });
    assert_eq!(
        pipeline.process_frame(&img.view()).unwrap(),
        Classification::Many
    );
    assert!(pipeline.camera_relative_position().is_some());
}

#[test]
fn out_of_frame_config_region_is_clamped() {
    let mut config = PipelineConfig::default();
    config.camera.frame = FrameSize::new(108, 192);
    let pipeline = VisionPipeline::new(config);
    let region = pipeline.region();
    assert_eq!((region.max_x(), region.max_y()), (108, 192));
}
