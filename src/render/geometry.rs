//! Shape geometry derived from an annotation's points
//!
//! Pure math shared by the display renderer and the exporter. Arrows,
//! rectangles and circles only look at the first and last point of a drag.

use std::f32::consts::PI;

use crate::domain::Point;

/// Arrow geometry constants
pub mod arrow {
    use super::PI;

    /// Angle between the shaft and each head stroke (30 degrees)
    pub const HEAD_ANGLE: f32 = PI / 6.0;
    /// Default head stroke length in image pixels
    pub const HEAD_LENGTH: f32 = 15.0;
}

/// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
pub const BEZIER_K: f32 = 0.552_284_8;

/// Shaft plus two head strokes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowGeometry {
    pub start: Point,
    pub end: Point,
    /// Direction of the shaft, `atan2(dy, dx)`
    pub angle: f32,
    /// Far ends of the two head strokes, at `angle - 30deg` and `angle + 30deg`
    pub head: [Point; 2],
}

impl ArrowGeometry {
    pub fn new(start: Point, end: Point, head_length: f32) -> Self {
        let angle = (end.y - start.y).atan2(end.x - start.x);
        let head_point = |a: f32| {
            Point::new(
                end.x - head_length * a.cos(),
                end.y - head_length * a.sin(),
            )
        };
        Self {
            start,
            end,
            angle,
            head: [
                head_point(angle - arrow::HEAD_ANGLE),
                head_point(angle + arrow::HEAD_ANGLE),
            ],
        }
    }
}

/// Rectangle anchored at the drag origin
///
/// Width and height may be negative so the rectangle can be dragged in any
/// direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectGeometry {
    pub fn new(first: Point, last: Point) -> Self {
        Self {
            x: first.x,
            y: first.y,
            width: last.x - first.x,
            height: last.y - first.y,
        }
    }

    /// Corners in drawing order, starting at the origin
    pub fn corners(&self) -> [Point; 4] {
        let (x2, y2) = (self.x + self.width, self.y + self.height);
        [
            Point::new(self.x, self.y),
            Point::new(x2, self.y),
            Point::new(x2, y2),
            Point::new(self.x, y2),
        ]
    }
}

/// Ellipse inscribed in the drag's bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseGeometry {
    pub center: Point,
    pub radius_x: f32,
    pub radius_y: f32,
}

impl EllipseGeometry {
    pub fn new(first: Point, last: Point) -> Self {
        Self {
            center: first.midpoint(last),
            radius_x: (last.x - first.x).abs() / 2.0,
            radius_y: (last.y - first.y).abs() / 2.0,
        }
    }
}
