//! External contour extraction from binary masks.
//!
//! Foreground is 8-connected and background 4-connected. A component is
//! *external* when the background region directly surrounding it reaches the
//! mask border; components sitting inside a hole of another component are
//! skipped. Each external component's outer border is traced with Suzuki-Abe
//! border following, starting at the component's first pixel in raster order.
//!
//! Contour area is the shoelace area of the traced pixel-center polygon, so
//! isolated pixels and one-pixel-wide strokes have zero area.

use nalgebra::Point2;
use ringstack_core::{Mask, PixelBox};
use serde::{Deserialize, Serialize};

/// Neighbour offsets, clockwise on screen (y grows downwards), starting east.
const DIRS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const WEST: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    /// Component label in [`ContourMap::labels`].
    pub label: u32,
    /// Border pixels in tracing order, mask coordinates.
    pub points: Vec<Point2<i32>>,
    /// Inclusive-exclusive bounding box in mask coordinates.
    pub bbox: PixelBox,
    /// Enclosed polygon area in mask pixels.
    pub area: f64,
}

/// All external contours of a mask, in discovery order, plus the component
/// label image they were traced from.
#[derive(Clone, Debug)]
pub struct ContourMap {
    pub width: usize,
    pub height: usize,
    /// Per-pixel component label, `0` for background.
    pub labels: Vec<u32>,
    pub contours: Vec<Contour>,
}

impl ContourMap {
    #[inline]
    pub fn label_at(&self, x: usize, y: usize) -> u32 {
        self.labels[y * self.width + x]
    }
}

/// Find the outer borders of all external components of `mask`.
pub fn find_external_contours(mask: &Mask) -> ContourMap {
    let (w, h) = (mask.width, mask.height);
    let outside = outer_background(mask);
    let mut labels = vec![0u32; w * h];
    let mut contours = Vec::new();
    let mut next_label = 1u32;
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if !mask.get(x, y) || labels[idx] != 0 {
                continue;
            }
            let label = next_label;
            next_label += 1;
            flood_component(mask, &mut labels, &mut stack, x, y, label);

            // (x, y) is the raster-first pixel of the component, so the pixel
            // above it is background belonging to the surrounding region.
            let external = y == 0 || outside[idx - w];
            if !external {
                continue;
            }

            let points = trace_outer_border(mask, (x as i64, y as i64));
            let bbox = bounding_box(&points);
            let area = polygon_area(&points);
            contours.push(Contour {
                label,
                points,
                bbox,
                area,
            });
        }
    }

    ContourMap {
        width: w,
        height: h,
        labels,
        contours,
    }
}

/// Background pixels 4-connected to the mask border.
fn outer_background(mask: &Mask) -> Vec<bool> {
    let (w, h) = (mask.width, mask.height);
    let mut outside = vec![false; w * h];
    if w == 0 || h == 0 {
        return outside;
    }
    let mut stack = Vec::new();

    let seed = |x: usize, y: usize, outside: &mut [bool], stack: &mut Vec<(usize, usize)>| {
        if !mask.get(x, y) && !outside[y * w + x] {
            outside[y * w + x] = true;
            stack.push((x, y));
        }
    };
    for x in 0..w {
        seed(x, 0, &mut outside, &mut stack);
        seed(x, h - 1, &mut outside, &mut stack);
    }
    for y in 0..h {
        seed(0, y, &mut outside, &mut stack);
        seed(w - 1, y, &mut outside, &mut stack);
    }

    while let Some((x, y)) = stack.pop() {
        let neighbours = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbours {
            if nx >= w || ny >= h {
                continue;
            }
            let idx = ny * w + nx;
            if !outside[idx] && !mask.get(nx, ny) {
                outside[idx] = true;
                stack.push((nx, ny));
            }
        }
    }
    outside
}

fn flood_component(
    mask: &Mask,
    labels: &mut [u32],
    stack: &mut Vec<(usize, usize)>,
    x: usize,
    y: usize,
    label: u32,
) {
    let w = mask.width;
    labels[y * w + x] = label;
    stack.push((x, y));
    while let Some((cx, cy)) = stack.pop() {
        for (dx, dy) in DIRS {
            let nx = cx as i64 + dx;
            let ny = cy as i64 + dy;
            if !mask.is_set(nx, ny) {
                continue;
            }
            let idx = ny as usize * w + nx as usize;
            if labels[idx] == 0 {
                labels[idx] = label;
                stack.push((nx as usize, ny as usize));
            }
        }
    }
}

#[inline]
fn step(p: (i64, i64), dir: usize) -> (i64, i64) {
    (p.0 + DIRS[dir].0, p.1 + DIRS[dir].1)
}

#[inline]
fn direction_to(from: (i64, i64), to: (i64, i64)) -> usize {
    let delta = (to.0 - from.0, to.1 - from.1);
    DIRS.iter().position(|&d| d == delta).unwrap_or(WEST)
}

fn trace_outer_border(mask: &Mask, start: (i64, i64)) -> Vec<Point2<i32>> {
    let to_point = |p: (i64, i64)| Point2::new(p.0 as i32, p.1 as i32);

    // Clockwise search from the west neighbour for the second border pixel.
    let first = (0..8).map(|k| (WEST + k) % 8).find(|&d| {
        let q = step(start, d);
        mask.is_set(q.0, q.1)
    });
    let Some(first_dir) = first else {
        return vec![to_point(start)];
    };
    let second = step(start, first_dir);

    let limit = 4 * mask.width * mask.height + 8;
    let mut points = Vec::new();
    let mut prev = second;
    let mut cur = start;
    while points.len() < limit {
        // Counter-clockwise search beginning just past the previous pixel.
        let back = direction_to(cur, prev);
        let mut next = prev;
        for k in 1..=8 {
            let q = step(cur, (back + 8 - k) % 8);
            if mask.is_set(q.0, q.1) {
                next = q;
                break;
            }
        }
        points.push(to_point(cur));
        if next == start && cur == second {
            break;
        }
        prev = cur;
        cur = next;
    }
    points
}

fn bounding_box(points: &[Point2<i32>]) -> PixelBox {
    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    PixelBox {
        min_x: min_x as u32,
        max_x: (max_x + 1) as u32,
        min_y: min_y as u32,
        max_y: (max_y + 1) as u32,
    }
}

/// Absolute shoelace area of a closed polygon.
pub fn polygon_area(points: &[Point2<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice += i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y);
    }
    twice.abs() as f64 * 0.5
}
