//! Pixel boxes and the allowed detection region.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Working resolution of the camera stream, in full-resolution pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box with inclusive minimum and exclusive maximum edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelBox {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl PixelBox {
    pub fn x_extent(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    pub fn y_extent(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    /// Multiply every edge by `factor`.
    pub fn scaled(&self, factor: u32) -> PixelBox {
        PixelBox {
            min_x: self.min_x * factor,
            max_x: self.max_x * factor,
            min_y: self.min_y * factor,
            max_y: self.max_y * factor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionEdge {
    MinX,
    MaxX,
    MinY,
    MaxY,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeDirection {
    Increase,
    Decrease,
}

/// Rectangle form of an [`AllowedRegion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Sub-rectangle of the frame outside which detections are ignored.
///
/// Every mutation clamps: minimum edges stay within `[0, max]`, maximum edges
/// within `[min, frame dimension]`. Out-of-range requests are never rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedRegion {
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
}

impl Default for AllowedRegion {
    fn default() -> Self {
        Self {
            min_x: 0,
            max_x: 480,
            min_y: 0,
            max_y: 1700,
        }
    }
}

impl AllowedRegion {
    /// Build a region from raw edges, clamped to `frame`.
    pub fn clamped(min_x: i64, max_x: i64, min_y: i64, max_y: i64, frame: FrameSize) -> Self {
        let (min_x, max_x) = clamp_axis(min_x, max_x, frame.width);
        let (min_y, max_y) = clamp_axis(min_y, max_y, frame.height);
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// The whole frame.
    pub fn full(frame: FrameSize) -> Self {
        Self {
            min_x: 0,
            max_x: frame.width,
            min_y: 0,
            max_y: frame.height,
        }
    }

    /// Re-apply the clamping invariant, e.g. after deserialization.
    pub fn clamp_to(self, frame: FrameSize) -> Self {
        Self::clamped(
            self.min_x.into(),
            self.max_x.into(),
            self.min_y.into(),
            self.max_y.into(),
            frame,
        )
    }

    pub fn min_x(&self) -> u32 {
        self.min_x
    }

    pub fn max_x(&self) -> u32 {
        self.max_x
    }

    pub fn min_y(&self) -> u32 {
        self.min_y
    }

    pub fn max_y(&self) -> u32 {
        self.max_y
    }

    pub fn edge(&self, edge: RegionEdge) -> u32 {
        match edge {
            RegionEdge::MinX => self.min_x,
            RegionEdge::MaxX => self.max_x,
            RegionEdge::MinY => self.min_y,
            RegionEdge::MaxY => self.max_y,
        }
    }

    /// Set one edge absolutely, clamping against the opposite edge and the frame.
    pub fn set_edge(&mut self, edge: RegionEdge, value: i64, frame: FrameSize) {
        match edge {
            RegionEdge::MinX => self.min_x = clamp_u32(value, 0, self.max_x),
            RegionEdge::MaxX => self.max_x = clamp_u32(value, self.min_x, frame.width),
            RegionEdge::MinY => self.min_y = clamp_u32(value, 0, self.max_y),
            RegionEdge::MaxY => self.max_y = clamp_u32(value, self.min_y, frame.height),
        }
    }

    /// Move one edge by a single pixel.
    pub fn nudge(&mut self, edge: RegionEdge, direction: NudgeDirection, frame: FrameSize) {
        let current = i64::from(self.edge(edge));
        let next = match direction {
            NudgeDirection::Increase => current + 1,
            NudgeDirection::Decrease => current - 1,
        };
        self.set_edge(edge, next, frame);
    }

    pub fn rect(&self) -> RegionRect {
        RegionRect {
            x: self.min_x,
            y: self.min_y,
            width: self.max_x - self.min_x,
            height: self.max_y - self.min_y,
        }
    }

    /// True when `bbox` lies entirely inside the region.
    pub fn contains_box(&self, bbox: &PixelBox) -> bool {
        bbox.min_x >= self.min_x
            && bbox.max_x <= self.max_x
            && bbox.min_y >= self.min_y
            && bbox.max_y <= self.max_y
    }
}

impl fmt::Display for AllowedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x:{}-{}, y:{}-{}",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

fn clamp_u32(value: i64, lo: u32, hi: u32) -> u32 {
    value.clamp(i64::from(lo), i64::from(hi.max(lo))) as u32
}

fn clamp_axis(min: i64, max: i64, dim: u32) -> (u32, u32) {
    let min = clamp_u32(min, 0, dim);
    let max = clamp_u32(max, min, dim);
    (min, max)
}
