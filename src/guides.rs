//! Drag-time alignment: snap deltas and guide lines.
//!
//! DESIGN
//! ======
//! Each axis is solved independently. For the horizontal axis the dragged
//! box's left, center and right are compared with every target's edges:
//! left/left, right/right, center/center, left/right and right/left (the
//! vertical axis mirrors this with top/middle/bottom). The candidate with
//! the smallest absolute delta strictly under the threshold wins; ties keep
//! the first candidate found, in target order.
//!
//! Both deltas are found first. Once an axis has snapped, one guide is
//! emitted at the snapped line. It lists every target with an edge or center
//! within the coincidence tolerance of that line and spans, on the cross
//! axis, the padded union of the snapped box and every target.

#[cfg(test)]
#[path = "guides_test.rs"]
mod guides_test;

use crate::consts::{GUIDE_PADDING, GUIDE_TOLERANCE, SNAP_THRESHOLD};
use crate::geom::Bounds;
use crate::model::{Node, NodeId};

/// Direction of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideOrientation {
    /// Line of constant x; `start`/`end` are y values.
    Vertical,
    /// Line of constant y; `start`/`end` are x values.
    Horizontal,
}

/// A transient alignment line shown while dragging.
#[derive(Debug, Clone, PartialEq)]
pub struct Guide {
    pub orientation: GuideOrientation,
    /// x for vertical guides, y for horizontal ones.
    pub position: f64,
    pub start: f64,
    pub end: f64,
    /// Targets whose bounds coincide with the line.
    pub aligned_with: Vec<NodeId>,
}

/// Snap offset to apply to the dragged node, plus the guides to draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapResult {
    pub dx: f64,
    pub dy: f64,
    pub guides: Vec<Guide>,
}

impl SnapResult {
    /// Whether neither axis snapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }
}

/// Tunables for the calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideOptions {
    /// Snap only when the delta is strictly below this.
    pub threshold: f64,
    /// Distance under which a target edge counts as on the line.
    pub tolerance: f64,
    /// Extra length on both ends of a guide.
    pub padding: f64,
}

impl Default for GuideOptions {
    fn default() -> Self {
        Self { threshold: SNAP_THRESHOLD, tolerance: GUIDE_TOLERANCE, padding: GUIDE_PADDING }
    }
}

/// A node the dragged box can align against.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub id: &'a str,
    pub bounds: Bounds,
}

/// Compute the snap for `dragged_id` against every other node.
///
/// Returns an empty result when the node is unknown.
#[must_use]
pub fn snap_node(dragged_id: &str, nodes: &[Node], options: &GuideOptions) -> SnapResult {
    let Some(dragged) = nodes.iter().find(|n| n.id == dragged_id) else {
        return SnapResult::default();
    };
    let targets: Vec<Target<'_>> = nodes
        .iter()
        .filter(|n| n.id != dragged_id)
        .map(|n| Target { id: n.id.as_str(), bounds: n.bounds() })
        .collect();
    snap_bounds(&dragged.bounds(), &targets, options)
}

/// Compute the snap for an arbitrary box against `targets`.
#[must_use]
pub fn snap_bounds(dragged: &Bounds, targets: &[Target<'_>], options: &GuideOptions) -> SnapResult {
    let x = best_line(dragged, targets, options.threshold, Axis::X);
    let y = best_line(dragged, targets, options.threshold, Axis::Y);
    let dx = x.map_or(0.0, |line| line.delta);
    let dy = y.map_or(0.0, |line| line.delta);

    // Guides are laid out against the fully snapped box.
    let snapped = dragged.translated(dx, dy);
    let guides = [(x, Axis::X), (y, Axis::Y)]
        .into_iter()
        .filter_map(|(line, axis)| build_guide(&snapped, targets, line?.position, options, axis))
        .collect();

    SnapResult { dx, dy, guides }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// `(low edge, center, high edge)` of a box along `axis`.
fn features(b: &Bounds, axis: Axis) -> [f64; 3] {
    match axis {
        Axis::X => [b.left(), b.center_x(), b.right()],
        Axis::Y => [b.top(), b.center_y(), b.bottom()],
    }
}

/// `(low, high)` extent of a box across `axis`.
fn cross_extent(b: &Bounds, axis: Axis) -> (f64, f64) {
    match axis {
        Axis::X => (b.top(), b.bottom()),
        Axis::Y => (b.left(), b.right()),
    }
}

#[derive(Debug, Clone, Copy)]
struct Line {
    delta: f64,
    position: f64,
}

fn best_line(dragged: &Bounds, targets: &[Target<'_>], threshold: f64, axis: Axis) -> Option<Line> {
    let [d_lo, d_mid, d_hi] = features(dragged, axis);
    let mut best: Option<Line> = None;

    for target in targets {
        let [o_lo, o_mid, o_hi] = features(&target.bounds, axis);
        // (dragged feature, target feature): same edges, centers, opposite edges.
        let pairs = [(d_lo, o_lo), (d_hi, o_hi), (d_mid, o_mid), (d_lo, o_hi), (d_hi, o_lo)];
        for (from, to) in pairs {
            let delta = to - from;
            if !delta.is_finite() || delta.abs() >= threshold {
                continue;
            }
            if best.is_none_or(|b| delta.abs() < b.delta.abs()) {
                best = Some(Line { delta, position: to });
            }
        }
    }
    best
}

fn build_guide(snapped: &Bounds, targets: &[Target<'_>], position: f64, options: &GuideOptions, axis: Axis) -> Option<Guide> {
    let aligned_with: Vec<NodeId> = targets
        .iter()
        .filter(|t| features(&t.bounds, axis).iter().any(|f| (f - position).abs() <= options.tolerance))
        .map(|t| t.id.to_string())
        .collect();
    if aligned_with.is_empty() {
        return None;
    }

    let (lo, hi) = targets.iter().fold(cross_extent(snapped, axis), |(lo, hi), t| {
        let (t_lo, t_hi) = cross_extent(&t.bounds, axis);
        (lo.min(t_lo), hi.max(t_hi))
    });
    let orientation = match axis {
        Axis::X => GuideOrientation::Vertical,
        Axis::Y => GuideOrientation::Horizontal,
    };
    Some(Guide { orientation, position, start: lo - options.padding, end: hi + options.padding, aligned_with })
}
