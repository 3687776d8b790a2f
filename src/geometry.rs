//! Coordinate-space math shared by hit-testing, rendering and fit-to-view.
//!
//! Model space is where states are stored. Screen space is viewport pixels,
//! related to model space by `screen = model * zoom + pan`.

use crate::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point in model or screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Viewport dimensions in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Rectangle representing position and size in model space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the right edge of the rectangle
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge of the rectangle
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this rectangle contains a point (edges included)
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// Axis-aligned extent of a set of rectangles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Convert a screen point to model space: `(screen - pan) / zoom`
pub fn to_model_space(screen: Point, pan: Point, zoom: f32) -> Point {
    Point::new((screen.x - pan.x) / zoom, (screen.y - pan.y) / zoom)
}

/// Convert a model point to screen space: `model * zoom + pan`
pub fn to_screen_space(model: Point, pan: Point, zoom: f32) -> Point {
    Point::new(model.x * zoom + pan.x, model.y * zoom + pan.y)
}

/// Inclusive point-in-rectangle test
pub fn point_in_rect(point: Point, rect: &Rectangle) -> bool {
    rect.contains_point(point)
}

/// Distance from `point` to the segment `start..end`.
///
/// The projection parameter is clamped to the segment, so points beyond an
/// endpoint measure to that endpoint. A zero-length segment degenerates to
/// the plain distance to `start`.
pub fn point_to_segment_distance(point: Point, start: Point, end: Point) -> f32 {
    let seg_x = end.x - start.x;
    let seg_y = end.y - start.y;
    let len_sq = seg_x * seg_x + seg_y * seg_y;

    if len_sq == 0.0 {
        return point.distance(start);
    }

    let t = ((point.x - start.x) * seg_x + (point.y - start.y) * seg_y) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let foot = Point::new(start.x + t * seg_x, start.y + t * seg_y);
    point.distance(foot)
}

/// Bounding box of a set of rectangles, or `EmptyScene` if there are none
pub fn bounding_box<'a, I>(rects: I) -> EditorResult<Bounds>
where
    I: IntoIterator<Item = &'a Rectangle>,
{
    rects
        .into_iter()
        .fold(None, |acc: Option<Bounds>, rect| {
            Some(match acc {
                None => Bounds {
                    min_x: rect.x,
                    min_y: rect.y,
                    max_x: rect.right(),
                    max_y: rect.bottom(),
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(rect.x),
                    min_y: b.min_y.min(rect.y),
                    max_x: b.max_x.max(rect.right()),
                    max_y: b.max_y.max(rect.bottom()),
                },
            })
        })
        .ok_or(EditorError::EmptyScene)
}
