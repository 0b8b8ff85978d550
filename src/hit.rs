//! Hit-testing: which node or edge is under a point.
//!
//! Nodes are tested against their shape outline, top-most (last painted)
//! first. Edges are tested against the straight segment between their
//! endpoint centers; routed paths are a rendering concern.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geom::{Point, distance_to_segment};
use crate::model::{Edge, Graph, Node};

/// Top-most node whose outline contains `pt`.
#[must_use]
pub fn node_at(nodes: &[Node], pt: Point) -> Option<&Node> {
    nodes.iter().rev().find(|node| {
        let bounds = node.bounds();
        bounds.contains(pt) && (node.shape.spec().outline)(&bounds).contains(pt)
    })
}

/// Closest edge whose center-to-center segment lies within `slop` of `pt`.
///
/// Ties go to the edge painted last.
#[must_use]
pub fn edge_at(graph: &Graph, pt: Point, slop: f64) -> Option<&Edge> {
    let mut best: Option<(&Edge, f64)> = None;
    for edge in graph.edges.iter().rev() {
        let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target)) else {
            continue;
        };
        let dist = distance_to_segment(pt, source.bounds().center(), target.bounds().center());
        if dist <= slop && best.is_none_or(|(_, d)| dist < d) {
            best = Some((edge, dist));
        }
    }
    best.map(|(edge, _)| edge)
}
