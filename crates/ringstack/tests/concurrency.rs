use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use ringstack::core::Mask;
use ringstack::{Classification, NudgeDirection, PipelineConfig, RegionEdge, VisionPipeline};

fn masks() -> [Mask; 3] {
    let mut many = Mask::new(270, 480);
    many.fill_rect(10, 100, 60, 150);
    let mut one = Mask::new(270, 480);
    one.fill_rect(20, 200, 30, 250);
    [many, one, Mask::new(270, 480)]
}

#[test]
fn readers_only_see_complete_snapshots() {
    let pipeline = VisionPipeline::shared(PipelineConfig::default());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut last_index = 0;
                let mut observed = 0usize;
                while !done.load(Ordering::Acquire) {
                    let snap = pipeline.snapshot();
                    assert!(snap.frame_index >= last_index);
                    last_index = snap.frame_index;

                    let expected = match snap.height_width_ratio() {
                        None if snap.frame_index == 0 => Classification::Unknown,
                        None => Classification::Empty,
                        Some(r) if r > 0.4 => Classification::Many,
                        Some(_) => Classification::One,
                    };
                    assert_eq!(snap.classification, expected, "frame {}", snap.frame_index);
                    observed += 1;
                }
                observed
            })
        })
        .collect();

    let tuner = {
        let pipeline = Arc::clone(&pipeline);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut up = true;
            while !done.load(Ordering::Acquire) {
                let dir = if up {
                    NudgeDirection::Increase
                } else {
                    NudgeDirection::Decrease
                };
                let region = pipeline.nudge(RegionEdge::MaxY, dir);
                assert!(region.min_y() <= region.max_y() && region.max_y() <= 1920);
                up = !up;
            }
        })
    };

    let masks = masks();
    for i in 0..300 {
        pipeline.process_mask(&masks[i % masks.len()]).unwrap();
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    tuner.join().unwrap();
    assert_eq!(pipeline.snapshot().frame_index, 300);
}

#[test]
fn geometry_reads_are_consistent_with_one_snapshot() {
    let pipeline = VisionPipeline::shared(PipelineConfig::default());
    let writer = {
        let pipeline = Arc::clone(&pipeline);
        thread::spawn(move || {
            let masks = masks();
            for i in 0..200 {
                pipeline.process_mask(&masks[i % 2]).unwrap();
            }
        })
    };
    for _ in 0..500 {
        if let Some(loc) = pipeline.localization() {
            assert!(loc.camera.distance.is_finite() && loc.camera.distance > 0.0);
            assert!(loc.robot.distance.is_finite());
            assert!(loc.robot.bearing.is_finite());
        }
    }
    writer.join().unwrap();
    assert!(pipeline.camera_relative_position().is_some());
}
