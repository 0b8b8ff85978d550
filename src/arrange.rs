//! Align and distribute operators for a multi-node selection.
//!
//! Both operators rewrite positions in place and report how many nodes
//! moved; the caller turns a non-zero count into one history entry. With a
//! grid unit, align snaps the governing coordinate (so aligned nodes stay
//! aligned) and distribute snaps each interior node's position.

#[cfg(test)]
#[path = "arrange_test.rs"]
mod arrange_test;

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::geom::snap_to_grid;
use crate::model::{Node, NodeId};

/// Positions must move by more than this to count as a change.
const MOVE_EPSILON: f64 = 1e-9;

/// Which edge or center to align on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignKind {
    /// Minimum left edge.
    Left,
    /// Average horizontal center.
    Center,
    /// Maximum right edge.
    Right,
    /// Minimum top edge.
    Top,
    /// Average vertical center.
    Middle,
    /// Maximum bottom edge.
    Bottom,
}

impl AlignKind {
    /// History reason tag.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Left => "align-left",
            Self::Center => "align-center",
            Self::Right => "align-right",
            Self::Top => "align-top",
            Self::Middle => "align-middle",
            Self::Bottom => "align-bottom",
        }
    }
}

/// Axis along which to distribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributeAxis {
    Horizontal,
    Vertical,
}

impl DistributeAxis {
    /// History reason tag.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Horizontal => "distribute-horizontal",
            Self::Vertical => "distribute-vertical",
        }
    }
}

/// Fewest selected nodes for [`align`].
pub const MIN_ALIGN: usize = 2;

/// Fewest selected nodes for [`distribute`].
pub const MIN_DISTRIBUTE: usize = 3;

/// Align the selected nodes. Returns the number of nodes that moved.
///
/// Does nothing with fewer than two selected nodes.
pub fn align(nodes: &mut [Node], selection: &HashSet<NodeId>, kind: AlignKind, grid: Option<f64>) -> usize {
    let picked: Vec<usize> = selected_indices(nodes, selection);
    if picked.len() < MIN_ALIGN {
        return 0;
    }

    let boxes: Vec<_> = picked.iter().map(|&i| nodes[i].bounds()).collect();
    #[allow(clippy::cast_precision_loss)]
    let count = boxes.len() as f64;
    let target = match kind {
        AlignKind::Left => boxes.iter().map(|b| b.left()).fold(f64::INFINITY, f64::min),
        AlignKind::Right => boxes.iter().map(|b| b.right()).fold(f64::NEG_INFINITY, f64::max),
        AlignKind::Center => boxes.iter().map(|b| b.center_x()).sum::<f64>() / count,
        AlignKind::Top => boxes.iter().map(|b| b.top()).fold(f64::INFINITY, f64::min),
        AlignKind::Bottom => boxes.iter().map(|b| b.bottom()).fold(f64::NEG_INFINITY, f64::max),
        AlignKind::Middle => boxes.iter().map(|b| b.center_y()).sum::<f64>() / count,
    };
    let target = snap_to_grid(target, grid);

    let mut moved = 0;
    for (&i, b) in picked.iter().zip(&boxes) {
        let node = &mut nodes[i];
        let before = node.position;
        match kind {
            AlignKind::Left => node.position.x = target,
            AlignKind::Center => node.position.x = target - b.width * 0.5,
            AlignKind::Right => node.position.x = target - b.width,
            AlignKind::Top => node.position.y = target,
            AlignKind::Middle => node.position.y = target - b.height * 0.5,
            AlignKind::Bottom => node.position.y = target - b.height,
        }
        if before.distance(node.position) > MOVE_EPSILON {
            moved += 1;
        }
    }
    moved
}

/// Space the selected nodes' centers evenly between the two extreme nodes.
/// Returns the number of nodes that moved.
///
/// Does nothing with fewer than three selected nodes.
pub fn distribute(nodes: &mut [Node], selection: &HashSet<NodeId>, axis: DistributeAxis, grid: Option<f64>) -> usize {
    let mut picked: Vec<(usize, f64)> = selected_indices(nodes, selection)
        .into_iter()
        .map(|i| {
            let b = nodes[i].bounds();
            let center = match axis {
                DistributeAxis::Horizontal => b.center_x(),
                DistributeAxis::Vertical => b.center_y(),
            };
            (i, center)
        })
        .collect();
    if picked.len() < MIN_DISTRIBUTE {
        return 0;
    }

    picked.sort_by(|(ia, ca), (ib, cb)| {
        ca.partial_cmp(cb)
            .unwrap_or(Ordering::Equal)
            .then_with(|| nodes[*ia].id.cmp(&nodes[*ib].id))
    });

    let first = picked[0].1;
    let last = picked[picked.len() - 1].1;
    #[allow(clippy::cast_precision_loss)]
    let step = (last - first) / (picked.len() - 1) as f64;

    let mut moved = 0;
    for (rank, &(i, _)) in picked.iter().enumerate().skip(1).take(picked.len() - 2) {
        #[allow(clippy::cast_precision_loss)]
        let center = first + step * rank as f64;
        let node = &mut nodes[i];
        let before = node.position;
        match axis {
            DistributeAxis::Horizontal => {
                node.position.x = snap_to_grid(center - node.width() * 0.5, grid);
            }
            DistributeAxis::Vertical => {
                node.position.y = snap_to_grid(center - node.height() * 0.5, grid);
            }
        }
        if before.distance(node.position) > MOVE_EPSILON {
            moved += 1;
        }
    }
    moved
}

fn selected_indices(nodes: &[Node], selection: &HashSet<NodeId>) -> Vec<usize> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| selection.contains(&n.id))
        .map(|(i, _)| i)
        .collect()
}
