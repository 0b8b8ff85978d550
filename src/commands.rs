//! Clipboard and delete commands over a node/edge subset.
//!
//! DESIGN
//! ======
//! Copy captures a deep snapshot of the selected nodes plus their internal
//! edges (both endpoints selected). Paste re-emits a snapshot with fresh ids:
//! every node id goes through a remap table and every edge is rewritten
//! through it, so an edge can only ever point at nodes created by the same
//! paste. Pasted nodes lose their `source_ref`; they are copies, not mirrors
//! of an external step.
//!
//! Delete cascades: removing a node removes every edge touching it in the
//! same pass, so the graph never holds a dangling edge.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::collections::{HashMap, HashSet};

use crate::model::{Edge, EdgeId, Graph, Node, NodeId, new_edge_id, new_node_id};

/// Deep copy of a node subset and its internal edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipboardSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl ClipboardSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Nodes and edges produced by a paste, ready to append to the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasteResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Original node id → pasted node id.
    pub id_map: HashMap<NodeId, NodeId>,
}

impl PasteResult {
    /// Ids of the pasted nodes, in paste order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }
}

/// What a delete removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteOutcome {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl DeleteOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Snapshot the selected nodes and the edges internal to the selection.
#[must_use]
pub fn copy(graph: &Graph, selection: &HashSet<NodeId>) -> ClipboardSnapshot {
    let nodes: Vec<Node> = graph
        .nodes
        .iter()
        .filter(|n| selection.contains(&n.id))
        .map(|n| Node { is_selection_source: false, ..n.clone() })
        .collect();
    let edges = graph
        .edges
        .iter()
        .filter(|e| selection.contains(&e.source) && selection.contains(&e.target))
        .cloned()
        .collect();
    ClipboardSnapshot { nodes, edges }
}

/// Re-emit `snapshot` with fresh ids, offset by `(dx, dy)`.
///
/// `taken` holds ids already present in the target graph; fresh ids avoid
/// them. Edges whose endpoints are not in the snapshot are dropped.
#[must_use]
pub fn paste(snapshot: &ClipboardSnapshot, dx: f64, dy: f64, taken: &HashSet<String>) -> PasteResult {
    let mut used: HashSet<String> = HashSet::new();
    let mut id_map: HashMap<NodeId, NodeId> = HashMap::with_capacity(snapshot.nodes.len());
    let mut nodes = Vec::with_capacity(snapshot.nodes.len());

    for original in &snapshot.nodes {
        if id_map.contains_key(&original.id) {
            continue;
        }
        let id = fresh(new_node_id, taken, &used);
        used.insert(id.clone());
        id_map.insert(original.id.clone(), id.clone());
        nodes.push(Node {
            id,
            position: original.position.offset(dx, dy),
            source_ref: None,
            is_selection_source: false,
            ..original.clone()
        });
    }

    let mut edges = Vec::with_capacity(snapshot.edges.len());
    for original in &snapshot.edges {
        let (Some(source), Some(target)) = (id_map.get(&original.source), id_map.get(&original.target)) else {
            continue;
        };
        let id = fresh(new_edge_id, taken, &used);
        used.insert(id.clone());
        edges.push(Edge { id, source: source.clone(), target: target.clone(), ..original.clone() });
    }

    PasteResult { nodes, edges, id_map }
}

/// Copy then paste the selection without going through a clipboard slot.
#[must_use]
pub fn duplicate(graph: &Graph, selection: &HashSet<NodeId>, dx: f64, dy: f64) -> PasteResult {
    let snapshot = copy(graph, selection);
    let mut taken = graph.node_ids();
    taken.extend(graph.edge_ids());
    paste(&snapshot, dx, dy, &taken)
}

/// Remove the given nodes and edges, cascading to edges touching removed nodes.
pub fn delete(graph: &mut Graph, node_ids: &HashSet<NodeId>, edge_ids: &HashSet<EdgeId>) -> DeleteOutcome {
    let nodes: Vec<NodeId> = graph
        .nodes
        .iter()
        .filter(|n| node_ids.contains(&n.id))
        .map(|n| n.id.clone())
        .collect();

    let mut edges = Vec::new();
    graph.edges.retain(|e| {
        let doomed = edge_ids.contains(&e.id);
        if doomed {
            edges.push(e.id.clone());
        }
        !doomed
    });
    edges.extend(graph.remove_nodes(node_ids));

    DeleteOutcome { nodes, edges }
}

fn fresh(make: fn() -> String, taken: &HashSet<String>, used: &HashSet<String>) -> String {
    loop {
        let id = make();
        if !taken.contains(&id) && !used.contains(&id) {
            return id;
        }
    }
}
