use std::sync::{Arc, Mutex, PoisonError};

use ringstack_detect::{Classification, Detection};
use serde::Serialize;

/// Result of one processed frame, published as a unit.
///
/// `classification` is always the classification of `detection`; readers get
/// both from the same `Arc` and never see a mix of two frames.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DetectionSnapshot {
    /// 1-based count of processed frames; 0 before the first frame.
    pub frame_index: u64,
    pub detection: Option<Detection>,
    pub classification: Classification,
}

impl DetectionSnapshot {
    pub fn height_width_ratio(&self) -> Option<f64> {
        self.detection.as_ref().and_then(Detection::height_width_ratio)
    }
}

/// Latest-value cell shared by the frame callback and the control loop.
///
/// The lock guards only a pointer swap or clone.
#[derive(Debug, Default)]
pub struct DetectionStore {
    latest: Mutex<Arc<DetectionSnapshot>>,
}

impl DetectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Arc<DetectionSnapshot> {
        Arc::clone(&self.latest.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the published snapshot.
    pub fn publish(&self, snapshot: DetectionSnapshot) {
        let next = Arc::new(snapshot);
        let mut guard = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringstack_core::PixelBox;

    #[test]
    fn starts_unknown() {
        let store = DetectionStore::new();
        let snap = store.latest();
        assert_eq!(snap.frame_index, 0);
        assert_eq!(snap.classification, Classification::Unknown);
        assert!(snap.detection.is_none());
    }

    #[test]
    fn publish_replaces_and_old_readers_keep_theirs() {
        let store = DetectionStore::new();
        let before = store.latest();
        store.publish(DetectionSnapshot {
            frame_index: 1,
            detection: Some(Detection {
                bbox: PixelBox {
                    min_x: 0,
                    max_x: 40,
                    min_y: 0,
                    max_y: 200,
                },
                area: 100.0,
                contour: Vec::new(),
                mean_color: None,
            }),
            classification: Classification::One,
        });
        let after = store.latest();
        assert_eq!(before.frame_index, 0);
        assert_eq!(after.frame_index, 1);
        assert_eq!(after.height_width_ratio(), Some(0.2));
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let store = Arc::new(DetectionStore::new());
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.latest.lock().unwrap();
            panic!("poison the store");
        })
        .join();
        store.publish(DetectionSnapshot {
            frame_index: 7,
            ..DetectionSnapshot::default()
        });
        assert_eq!(store.latest().frame_index, 7);
    }
}
