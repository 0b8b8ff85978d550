//! Graph model: nodes, edges, legend items and the live graph container.
//!
//! This module defines what is on the diagram (`Node`, `Edge`,
//! `LegendItem`) and the `Graph` that owns the live node and edge lists.
//! Edges reference nodes by id only; `Graph` is responsible for keeping
//! every edge endpoint resolvable, which is why node removal always goes
//! through [`Graph::remove_nodes`] and its cascade.
//!
//! Data flows into this layer from the codec (document load), the sync
//! engine and the command layer. The controller reads it for rendering and
//! persistence, and snapshots it for history.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_EDGE_COLOR, DEFAULT_EDGE_WIDTH, DEFAULT_FONT_SIZE};
use crate::geom::{Bounds, Point};
use crate::shape::ShapeKind;

/// Unique identifier for a node within one document.
pub type NodeId = String;

/// Unique identifier for an edge within one document.
pub type EdgeId = String;

// =============================================================================
// NODE
// =============================================================================

/// Optional visual overrides for a node. Absent fields use shape defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl NodeStyle {
    /// Drop numeric fields that are non-finite or not strictly positive.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.filter(|v| is_positive_finite(*v));
        self.height = self.height.filter(|v| is_positive_finite(*v));
        self.font_size = self.font_size.filter(|v| is_positive_finite(*v));
        self
    }

    /// Whether no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// What activating a node does in the host view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionKind {
    /// Open another process; `target` is its identifier.
    NavigateToProcess,
    /// Open an external link; `target` is the URL.
    OpenUrl,
    /// Show a tooltip; `target` is the text.
    ShowTooltip,
}

/// Activation behaviour attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub target: String,
}

/// A visual step in the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique, stable identifier.
    pub id: NodeId,
    /// Registry key of the node's shape.
    pub shape: ShapeKind,
    /// Display text.
    pub label: String,
    /// Top-left corner in world coordinates.
    pub position: Point,
    /// Visual overrides.
    pub style: NodeStyle,
    /// Key of the external step record this node mirrors, if any.
    pub source_ref: Option<String>,
    /// Activation behaviour, if any.
    pub interaction: Option<Interaction>,
    /// True only while this node is the armed source in connect-mode.
    pub is_selection_source: bool,
}

impl Node {
    #[must_use]
    pub fn new(id: impl Into<NodeId>, shape: ShapeKind, label: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            shape,
            label: label.into(),
            position,
            style: NodeStyle::default(),
            source_ref: None,
            interaction: None,
            is_selection_source: false,
        }
    }

    /// Rendered width: the style override when valid, else the shape default.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.style
            .width
            .filter(|v| is_positive_finite(*v))
            .unwrap_or(self.shape.spec().default_width)
    }

    /// Rendered height: the style override when valid, else the shape default.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.style
            .height
            .filter(|v| is_positive_finite(*v))
            .unwrap_or(self.shape.spec().default_height)
    }

    /// Label font size, defaulting when absent or invalid.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.style
            .font_size
            .filter(|v| is_positive_finite(*v))
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// World-space bounding box.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin(self.position, self.width(), self.height())
    }
}

// =============================================================================
// EDGE
// =============================================================================

/// Routing style for an edge. Affects rendering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Orthogonal,
    Step,
    Smooth,
}

impl EdgeKind {
    /// Parse a persisted key, `None` when unknown.
    #[must_use]
    pub fn from_key(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "orthogonal" => Some(Self::Orthogonal),
            "step" => Some(Self::Step),
            "smooth" | "smoothstep" | "bezier" => Some(Self::Smooth),
            _ => None,
        }
    }
}

/// Small label drawn at the edge midpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub color: Option<String>,
    pub background: Option<String>,
}

/// A directed connector between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub label: Option<String>,
    pub kind: EdgeKind,
    pub color: String,
    pub width: f64,
    pub badge: Option<Badge>,
}

impl Edge {
    #[must_use]
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
            kind: EdgeKind::default(),
            color: DEFAULT_EDGE_COLOR.to_string(),
            width: DEFAULT_EDGE_WIDTH,
            badge: None,
        }
    }

    /// Whether either endpoint is `node_id`.
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

// =============================================================================
// LEGEND
// =============================================================================

/// Descriptive legend entry. Carries no graph semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendItem {
    pub key: String,
    pub label: String,
    pub color: String,
    pub background: Option<String>,
}

// =============================================================================
// GRAPH
// =============================================================================

/// Live node and edge lists. Node order is paint order (last on top).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    #[must_use]
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Whether an edge `source → target` exists (direction matters).
    #[must_use]
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edges.iter().any(|e| e.source == source && e.target == target)
    }

    /// All node ids.
    #[must_use]
    pub fn node_ids(&self) -> HashSet<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// All edge ids.
    #[must_use]
    pub fn edge_ids(&self) -> HashSet<EdgeId> {
        self.edges.iter().map(|e| e.id.clone()).collect()
    }

    /// Remove the given nodes and every edge touching one of them.
    ///
    /// Returns the ids of the removed edges.
    pub fn remove_nodes(&mut self, ids: &HashSet<NodeId>) -> Vec<EdgeId> {
        if ids.is_empty() {
            return Vec::new();
        }
        self.nodes.retain(|n| !ids.contains(&n.id));
        let mut removed = Vec::new();
        self.edges.retain(|e| {
            let dangling = ids.contains(&e.source) || ids.contains(&e.target);
            if dangling {
                removed.push(e.id.clone());
            }
            !dangling
        });
        removed
    }

    /// Remove edges whose endpoints no longer resolve. Returns their ids.
    pub fn prune_dangling_edges(&mut self) -> Vec<EdgeId> {
        let ids = self.node_ids();
        let mut removed = Vec::new();
        self.edges.retain(|e| {
            let ok = ids.contains(&e.source) && ids.contains(&e.target);
            if !ok {
                removed.push(e.id.clone());
            }
            ok
        });
        removed
    }

    /// Flag exactly `source` (or nobody) as the armed connect-mode source.
    pub fn set_selection_source(&mut self, source: Option<&str>) {
        for node in &mut self.nodes {
            node.is_selection_source = source == Some(node.id.as_str());
        }
    }

    /// Copy with transient UI flags cleared, suitable for snapshots.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut copy = self.clone();
        copy.set_selection_source(None);
        copy
    }

    /// Whether node ids are unique and every edge endpoint resolves.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let ids = self.node_ids();
        ids.len() == self.nodes.len() && self.edges.iter().all(|e| ids.contains(&e.source) && ids.contains(&e.target))
    }
}

/// Fresh node id, unique across documents.
#[must_use]
pub fn new_node_id() -> NodeId {
    format!("node-{}", Uuid::new_v4())
}

/// Fresh edge id, unique across documents.
#[must_use]
pub fn new_edge_id() -> EdgeId {
    format!("edge-{}", Uuid::new_v4())
}

/// Whether `v` is finite and strictly positive.
#[must_use]
pub fn is_positive_finite(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
