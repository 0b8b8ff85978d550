//! Step-list synchronisation: derive the node set from an ordered list of
//! external step records while keeping manual layout.
//!
//! DESIGN
//! ======
//! A node mirrors a step when its `source_ref` equals the trimmed step key;
//! blank keys are ignored. For every step, an existing mirror keeps its id,
//! position and style and only gets its label refreshed; a missing mirror is
//! created at a deterministic grid cell chosen from the step's index. Mirrors whose key disappeared are
//! dropped. Nodes without a `source_ref` are not driven by the step list and
//! are carried over after the mirrors, in their previous order.
//!
//! Running the sync twice on the same list is a no-op the second time, so
//! the controller can call it every time the provider emits.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::consts::{GRID_COLUMN_WIDTH, GRID_MAX_COLUMNS, GRID_MIN_COLUMNS, GRID_ORIGIN_X, GRID_ORIGIN_Y, GRID_ROW_GAP};
use crate::geom::Point;
use crate::model::{Node, NodeId, new_node_id};
use crate::shape::ShapeKind;

/// One external step, as supplied by the step-list provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Stable key; becomes the mirror node's `source_ref`.
    pub key: String,
    /// Text shown on the node.
    pub display_name: String,
}

impl StepRecord {
    #[must_use]
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { key: key.into(), display_name: display_name.into() }
    }
}

/// Row-major grid used to place newly created nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Top-left corner of the first cell.
    pub origin: Point,
    /// Horizontal distance between column origins.
    pub column_width: f64,
    /// Vertical distance between row origins.
    pub row_gap: f64,
    /// Fewest columns used, whatever the item count.
    pub min_columns: usize,
    /// Most columns used, whatever the item count.
    pub max_columns: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            origin: Point::new(GRID_ORIGIN_X, GRID_ORIGIN_Y),
            column_width: GRID_COLUMN_WIDTH,
            row_gap: GRID_ROW_GAP,
            min_columns: GRID_MIN_COLUMNS,
            max_columns: GRID_MAX_COLUMNS,
        }
    }
}

impl GridLayout {
    /// Column count for `count` items: the square-ish root, clamped to the
    /// configured range.
    #[must_use]
    pub fn columns_for(&self, count: usize) -> usize {
        let min = self.min_columns.max(1);
        let max = self.max_columns.max(min);
        let mut root = 0;
        while root * root < count {
            root += 1;
        }
        root.clamp(min, max)
    }

    /// Position of item `index` out of `count`, row-major.
    #[must_use]
    pub fn position(&self, index: usize, count: usize) -> Point {
        let columns = self.columns_for(count);
        let col = index % columns;
        let row = index / columns;
        #[allow(clippy::cast_precision_loss)]
        let (col, row) = (col as f64, row as f64);
        Point::new(self.origin.x + col * self.column_width, self.origin.y + row * self.row_gap)
    }
}

/// Result of one synchronisation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    /// The new node list: mirrors in step order, then free nodes.
    pub nodes: Vec<Node>,
    /// Ids of mirrors created by this pass.
    pub added: Vec<NodeId>,
    /// Ids of mirrors dropped because their key vanished.
    pub removed: Vec<NodeId>,
    /// Whether `nodes` differs from the input.
    pub changed: bool,
}

/// Rebuild the node list from `steps`, preserving existing mirrors.
#[must_use]
pub fn sync_nodes(existing: &[Node], steps: &[StepRecord], layout: &GridLayout) -> SyncOutcome {
    // First mirror per key wins; later ones are stale duplicates.
    let mut mirrors: HashMap<&str, &Node> = HashMap::new();
    for node in existing {
        if let Some(key) = node.source_ref.as_deref() {
            mirrors.entry(key).or_insert(node);
        }
    }

    let free: Vec<&Node> = existing.iter().filter(|n| n.source_ref.is_none()).collect();
    let mut taken: HashSet<NodeId> = free.iter().map(|n| n.id.clone()).collect();
    taken.extend(mirrors.values().map(|n| n.id.clone()));

    let mut seen_keys: HashSet<&str> = HashSet::new();
    let mut used: HashSet<NodeId> = HashSet::new();
    let mut nodes = Vec::with_capacity(steps.len() + free.len());
    let mut added = Vec::new();

    for (index, step) in steps.iter().enumerate() {
        let key = step.key.trim();
        if key.is_empty() {
            warn!(index, "blank step key; record ignored");
            continue;
        }
        if !seen_keys.insert(key) {
            warn!(key, "duplicate step key; later record ignored");
            continue;
        }
        if let Some(node) = mirrors.get(key) {
            let mut node = (*node).clone();
            node.label.clone_from(&step.display_name);
            node.source_ref = Some(key.to_string());
            used.insert(node.id.clone());
            nodes.push(node);
        } else {
            let id = mirror_id(key, &taken);
            taken.insert(id.clone());
            let mut node = Node::new(
                id.clone(),
                ShapeKind::Rectangle,
                step.display_name.clone(),
                layout.position(index, steps.len()),
            );
            node.source_ref = Some(key.to_string());
            added.push(id);
            nodes.push(node);
        }
    }

    let removed: Vec<NodeId> = existing
        .iter()
        .filter(|n| n.source_ref.is_some() && !used.contains(&n.id))
        .map(|n| n.id.clone())
        .collect();

    nodes.extend(free.into_iter().cloned());
    let changed = nodes.as_slice() != existing;

    debug!(added = added.len(), removed = removed.len(), total = nodes.len(), changed, "step sync");
    SyncOutcome { nodes, added, removed, changed }
}

/// `step-<key>` when free, otherwise a fresh id.
fn mirror_id(key: &str, taken: &HashSet<NodeId>) -> NodeId {
    let candidate = format!("step-{key}");
    if taken.contains(&candidate) { new_node_id() } else { candidate }
}
