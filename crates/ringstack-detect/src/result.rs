use nalgebra::Point2;
use ringstack_core::PixelBox;
use serde::{Deserialize, Serialize};

/// The largest qualifying contour of one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in full-resolution pixels.
    pub bbox: PixelBox,
    /// Enclosed contour area in downsampled pixels.
    pub area: f64,
    /// Border polygon in full-resolution pixels.
    pub contour: Vec<Point2<i32>>,
    /// Mean RGB over the component's pixels, when the source frame is known.
    pub mean_color: Option<[f32; 3]>,
}

impl Detection {
    /// Object height in pixels.
    ///
    /// The camera streams sideways, so the object's vertical extent runs along
    /// image x.
    pub fn height_in_pixels(&self) -> u32 {
        self.bbox.x_extent()
    }

    /// Object width in pixels, measured along image y.
    pub fn width_in_pixels(&self) -> u32 {
        self.bbox.y_extent()
    }

    /// `height / width`, or `None` for a zero-width box.
    pub fn height_width_ratio(&self) -> Option<f64> {
        let width = self.width_in_pixels();
        if width == 0 {
            return None;
        }
        Some(f64::from(self.height_in_pixels()) / f64::from(width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(bbox: PixelBox) -> Detection {
        Detection {
            bbox,
            area: 1.0,
            contour: Vec::new(),
            mean_color: None,
        }
    }

    #[test]
    fn ratio_is_x_extent_over_y_extent() {
        let det = detection(PixelBox {
            min_x: 100,
            max_x: 160,
            min_y: 400,
            max_y: 640,
        });
        assert_eq!(det.height_in_pixels(), 60);
        assert_eq!(det.width_in_pixels(), 240);
        assert_eq!(det.height_width_ratio(), Some(60.0 / 240.0));
    }

    #[test]
    fn zero_width_has_no_ratio() {
        let det = detection(PixelBox {
            min_x: 0,
            max_x: 8,
            min_y: 40,
            max_y: 40,
        });
        assert_eq!(det.height_width_ratio(), None);
    }
}
