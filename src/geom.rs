#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise offset.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box in world space.
///
/// `x` / `y` is the top-left corner; width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width: width.max(0.0), height: height.max(0.0) }
    }

    #[must_use]
    pub fn from_origin(origin: Point, width: f64, height: f64) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width * 0.5
    }

    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + self.height * 0.5
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Same box moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Box grown by `pad` on every side.
    #[must_use]
    pub fn padded(&self, pad: f64) -> Self {
        Self::new(self.x - pad, self.y - pad, self.width + pad * 2.0, self.height + pad * 2.0)
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Self {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }

    /// Union of every box in `iter`, or `None` when empty.
    pub fn union_all<'a>(iter: impl IntoIterator<Item = &'a Bounds>) -> Option<Self> {
        iter.into_iter().fold(None, |acc, b| match acc {
            None => Some(*b),
            Some(u) => Some(u.union(b)),
        })
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left() && pt.x <= self.right() && pt.y >= self.top() && pt.y <= self.bottom()
    }
}

/// Distance from `pt` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(pt: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < f64::EPSILON {
        return pt.distance(a);
    }
    let t = (((pt.x - a.x) * dx + (pt.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    pt.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Round `value` to the nearest multiple of `unit`. Non-positive units disable snapping.
#[must_use]
pub fn snap_to_grid(value: f64, unit: Option<f64>) -> f64 {
    match unit {
        Some(u) if u > 0.0 && u.is_finite() => (value / u).round() * u,
        _ => value,
    }
}
