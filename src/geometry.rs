// src/geometry.rs
//
// Minimal 2D types for hit-testing, output clamping and pointer
// confinement. Compositor space: x grows right, y grows down, f64
// coordinates.

use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
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

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned rectangle. Edges are inclusive for containment checks,
/// matching how pointer confinement regions behave.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Clamps a point to lie within the rectangle.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.x, self.right()),
            p.y.clamp(self.y, self.bottom()),
        )
    }

    /// Bounding box of two rectangles.
    pub fn united(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Squared distance from a point to the nearest point of the rectangle.
    /// Zero if the point is inside.
    pub fn distance_squared(&self, p: Point) -> f64 {
        let clamped = self.clamp(p);
        let d = p - clamped;
        d.x * d.x + d.y * d.y
    }
}

/// A set of rectangles, used for surface-declared confinement and lock
/// regions. Membership is the union of the member rects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    pub fn new(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty() || self.rects.iter().all(|r| r.width <= 0.0 || r.height <= 0.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.rects.iter().any(|r| r.contains(p))
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Region::new(vec![rect])
    }
}

/// Clamps a proposed pointer position against the active outputs: first to
/// the bounding box of all outputs, then (if the union box landed the point
/// between outputs) into the nearest single output.
pub fn confine_to_outputs(proposed: Point, outputs: &[Rect]) -> Point {
    let Some(first) = outputs.first() else {
        return proposed;
    };
    if outputs.iter().any(|o| o.contains(proposed)) {
        return proposed;
    }
    let union = outputs.iter().skip(1).fold(*first, |acc, o| acc.united(o));
    let clamped = union.clamp(proposed);
    if outputs.iter().any(|o| o.contains(clamped)) {
        return clamped;
    }
    let nearest = outputs
        .iter()
        .min_by(|a, b| {
            a.distance_squared(clamped)
                .total_cmp(&b.distance_squared(clamped))
        })
        .copied()
        .unwrap_or(*first);
    nearest.clamp(clamped)
}
