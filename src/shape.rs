//! Shape kinds and the static shape registry.
//!
//! Every node carries a [`ShapeKind`]. Rendering-relevant facts about a kind
//! (default size, palette icon, outline path) live in one lookup table of
//! [`ShapeSpec`] records. Lookups never fail: keys missing from the table
//! resolve to the rectangle entry, so a document written by a newer editor
//! still opens and keeps its unknown keys intact for the next save.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};

use crate::geom::{Bounds, Point};

/// The kind of a node's shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeKind {
    /// Process step.
    #[default]
    Rectangle,
    /// Decision.
    Diamond,
    /// Start / end event.
    Circle,
    /// Exclusive gateway (diamond with an inscribed cross).
    DiamondX,
    /// Any other registry key, resolved through [`ShapeKind::spec`].
    Extended(String),
}

impl ShapeKind {
    /// Parse a persisted key. Empty input yields the default shape; unknown
    /// keys are kept as [`ShapeKind::Extended`].
    #[must_use]
    pub fn from_key(raw: &str) -> Self {
        let key = raw.trim().to_ascii_lowercase();
        match key.as_str() {
            "" | "rectangle" | "rect" => Self::Rectangle,
            "diamond" | "decision" => Self::Diamond,
            "circle" | "ellipse" => Self::Circle,
            "diamond-x" | "diamondx" | "exclusive" => Self::DiamondX,
            _ => Self::Extended(key),
        }
    }

    /// The persisted key for this kind.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Diamond => "diamond",
            Self::Circle => "circle",
            Self::DiamondX => "diamond-x",
            Self::Extended(key) => key,
        }
    }

    /// Registry entry for this kind, falling back to the rectangle entry.
    #[must_use]
    pub fn spec(&self) -> &'static ShapeSpec {
        lookup(self.key()).unwrap_or(&SHAPES[0])
    }

    /// Whether the registry knows this kind without falling back.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        lookup(self.key()).is_some()
    }
}

impl From<String> for ShapeKind {
    fn from(raw: String) -> Self {
        Self::from_key(&raw)
    }
}

impl From<ShapeKind> for String {
    fn from(kind: ShapeKind) -> Self {
        kind.key().to_string()
    }
}

/// Drawable outline of a shape, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapePath {
    /// Closed polygon; the last vertex connects back to the first.
    Polygon(Vec<Point>),
    /// Axis-aligned ellipse.
    Ellipse { center: Point, rx: f64, ry: f64 },
}

impl ShapePath {
    /// Whether `pt` lies inside (or on) the outline.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        match self {
            Self::Ellipse { center, rx, ry } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return false;
                }
                let nx = (pt.x - center.x) / rx;
                let ny = (pt.y - center.y) / ry;
                nx * nx + ny * ny <= 1.0
            }
            Self::Polygon(vertices) => polygon_contains(vertices, pt),
        }
    }
}

/// Registry record for one shape kind.
#[derive(Debug)]
pub struct ShapeSpec {
    /// Persisted key.
    pub key: &'static str,
    /// Width used when the node's style has none.
    pub default_width: f64,
    /// Height used when the node's style has none.
    pub default_height: f64,
    /// Palette icon name for the host's icon set.
    pub icon: &'static str,
    /// Outline builder for the given bounds.
    pub outline: fn(&Bounds) -> ShapePath,
}

/// Every registered shape. Index 0 is the fallback entry.
pub static SHAPES: &[ShapeSpec] = &[
    ShapeSpec { key: "rectangle", default_width: 180.0, default_height: 64.0, icon: "square", outline: rect_outline },
    ShapeSpec { key: "diamond", default_width: 140.0, default_height: 90.0, icon: "diamond", outline: diamond_outline },
    ShapeSpec { key: "circle", default_width: 72.0, default_height: 72.0, icon: "circle", outline: ellipse_outline },
    ShapeSpec { key: "diamond-x", default_width: 64.0, default_height: 64.0, icon: "diamond-x", outline: diamond_outline },
    ShapeSpec { key: "terminal", default_width: 160.0, default_height: 56.0, icon: "pill", outline: terminal_outline },
    ShapeSpec { key: "document", default_width: 180.0, default_height: 72.0, icon: "file", outline: document_outline },
    ShapeSpec { key: "data", default_width: 180.0, default_height: 64.0, icon: "parallelogram", outline: data_outline },
    ShapeSpec { key: "subprocess", default_width: 180.0, default_height: 64.0, icon: "square-stack", outline: rect_outline },
];

/// Find a registry entry by key.
#[must_use]
pub fn lookup(key: &str) -> Option<&'static ShapeSpec> {
    SHAPES.iter().find(|spec| spec.key == key)
}

fn rect_outline(b: &Bounds) -> ShapePath {
    ShapePath::Polygon(vec![
        Point::new(b.left(), b.top()),
        Point::new(b.right(), b.top()),
        Point::new(b.right(), b.bottom()),
        Point::new(b.left(), b.bottom()),
    ])
}

fn diamond_outline(b: &Bounds) -> ShapePath {
    ShapePath::Polygon(vec![
        Point::new(b.center_x(), b.top()),
        Point::new(b.right(), b.center_y()),
        Point::new(b.center_x(), b.bottom()),
        Point::new(b.left(), b.center_y()),
    ])
}

fn ellipse_outline(b: &Bounds) -> ShapePath {
    ShapePath::Ellipse { center: b.center(), rx: b.width * 0.5, ry: b.height * 0.5 }
}

fn terminal_outline(b: &Bounds) -> ShapePath {
    // Stadium: straight top/bottom with the rounded ends cut as chamfers.
    let r = (b.height * 0.5).min(b.width * 0.5);
    ShapePath::Polygon(vec![
        Point::new(b.left() + r, b.top()),
        Point::new(b.right() - r, b.top()),
        Point::new(b.right(), b.center_y()),
        Point::new(b.right() - r, b.bottom()),
        Point::new(b.left() + r, b.bottom()),
        Point::new(b.left(), b.center_y()),
    ])
}

fn document_outline(b: &Bounds) -> ShapePath {
    let wave = b.height * 0.12;
    ShapePath::Polygon(vec![
        Point::new(b.left(), b.top()),
        Point::new(b.right(), b.top()),
        Point::new(b.right(), b.bottom() - wave),
        Point::new(b.left() + b.width * 0.75, b.bottom() - wave * 2.0),
        Point::new(b.left() + b.width * 0.25, b.bottom()),
        Point::new(b.left(), b.bottom() - wave),
    ])
}

fn data_outline(b: &Bounds) -> ShapePath {
    let skew = (b.width * 0.15).min(b.height * 0.5);
    ShapePath::Polygon(vec![
        Point::new(b.left() + skew, b.top()),
        Point::new(b.right(), b.top()),
        Point::new(b.right() - skew, b.bottom()),
        Point::new(b.left(), b.bottom()),
    ])
}

/// Even-odd ray cast; points on an edge count as inside.
fn polygon_contains(vertices: &[Point], pt: Point) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];
        if crate::geom::distance_to_segment(pt, a, b) < 1e-9 {
            return true;
        }
        if (a.y > pt.y) != (b.y > pt.y) {
            let cross_x = (b.x - a.x) * (pt.y - a.y) / (b.y - a.y) + a.x;
            if pt.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
