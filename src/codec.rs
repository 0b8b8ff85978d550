//! Persisted document format and conversion to/from the live graph.
//!
//! DESIGN
//! ======
//! Decoding is split in two phases. The first turns arbitrary JSON into a
//! typed [`Document`] one record at a time through a lenient accessor, so a
//! malformed record degrades (fresh id, default shape, zero position)
//! instead of failing the whole payload. The second turns a `Document` into
//! a [`Diagram`] and enforces the graph invariants: unique node ids, edges
//! whose endpoints resolve, an entry node that exists.
//!
//! ERROR HANDLING
//! ==============
//! The only fatal condition is a payload that is not a JSON object. Every
//! record-level problem is counted in the [`DecodeReport`] and logged.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::consts::{DEFAULT_EDGE_COLOR, DEFAULT_EDGE_WIDTH, DEFAULT_LEGEND_COLOR};
use crate::geom::Point;
use crate::model::{
    Badge, Edge, EdgeKind, Graph, Interaction, InteractionKind, LegendItem, Node, NodeId, NodeStyle,
    is_positive_finite, new_edge_id, new_node_id,
};
use crate::shape::ShapeKind;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document root must be a JSON object")]
    NotAnObject,
}

impl crate::error::ErrorCode for CodecError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "E_DOCUMENT_JSON",
            Self::NotAnObject => "E_DOCUMENT_NOT_OBJECT",
        }
    }
}

/// Persisted flowchart document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_node_id: Option<String>,
    #[serde(default)]
    pub nodes: Vec<DocumentNode>,
    #[serde(default)]
    pub edges: Vec<DocumentEdge>,
    #[serde(default)]
    pub legend: Vec<DocumentLegendItem>,
}

/// Persisted node record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    #[serde(default)]
    pub shape_kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,
}

/// Persisted edge record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EdgeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_bg: Option<String>,
}

/// Persisted legend entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLegendItem {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// Runtime form of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    pub entry_node_id: Option<NodeId>,
    pub graph: Graph,
    pub legend: Vec<LegendItem>,
}

/// Counts of records that were repaired or dropped while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Records kept with at least one field replaced by a default.
    pub repaired: usize,
    /// Node records dropped (duplicate ids).
    pub dropped_nodes: usize,
    /// Edge records dropped (missing, empty or unresolved endpoints).
    pub dropped_edges: usize,
}

impl DecodeReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// ENCODE
// =============================================================================

/// Convert the runtime diagram into its persisted form.
#[must_use]
pub fn encode(diagram: &Diagram) -> Document {
    let nodes = diagram
        .graph
        .nodes
        .iter()
        .map(|n| DocumentNode {
            id: n.id.clone(),
            source_ref: n.source_ref.clone(),
            shape_kind: n.shape.key().to_string(),
            label: n.label.clone(),
            position: n.position,
            style: if n.style.is_empty() { None } else { Some(n.style.clone()) },
            interaction: n.interaction.clone(),
        })
        .collect();

    let edges = diagram
        .graph
        .edges
        .iter()
        .map(|e| DocumentEdge {
            id: e.id.clone(),
            from: e.source.clone(),
            to: e.target.clone(),
            label: e.label.clone(),
            kind: Some(e.kind),
            color: Some(e.color.clone()),
            width: Some(e.width),
            badge_text: e.badge.as_ref().map(|b| b.text.clone()),
            badge_color: e.badge.as_ref().and_then(|b| b.color.clone()),
            badge_bg: e.badge.as_ref().and_then(|b| b.background.clone()),
        })
        .collect();

    let legend = diagram
        .legend
        .iter()
        .map(|l| DocumentLegendItem {
            key: l.key.clone(),
            label: l.label.clone(),
            color: Some(l.color.clone()),
            background: l.background.clone(),
        })
        .collect();

    Document { entry_node_id: diagram.entry_node_id.clone(), nodes, edges, legend }
}

/// Encode straight to a JSON value.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn encode_value(diagram: &Diagram) -> Result<Value, CodecError> {
    Ok(serde_json::to_value(encode(diagram))?)
}

// =============================================================================
// DECODE: DOCUMENT -> DIAGRAM
// =============================================================================

/// Convert a typed document into a runtime diagram, enforcing graph invariants.
#[must_use]
pub fn decode(doc: &Document) -> (Diagram, DecodeReport) {
    let mut report = DecodeReport::default();

    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut nodes = Vec::with_capacity(doc.nodes.len());
    for record in &doc.nodes {
        let id = match record.id.trim() {
            "" => {
                report.repaired += 1;
                new_node_id()
            }
            trimmed => trimmed.to_string(),
        };
        if !seen.insert(id.clone()) {
            warn!(node_id = %id, "duplicate node id; record dropped");
            report.dropped_nodes += 1;
            continue;
        }
        let position = if record.position.x.is_finite() && record.position.y.is_finite() {
            record.position
        } else {
            report.repaired += 1;
            Point::default()
        };
        let style = record.style.clone().map(NodeStyle::sanitized).unwrap_or_default();
        nodes.push(Node {
            id,
            shape: ShapeKind::from_key(&record.shape_kind),
            label: record.label.clone(),
            position,
            style,
            source_ref: record
                .source_ref
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            interaction: record.interaction.clone(),
            is_selection_source: false,
        });
    }

    let mut edge_ids: HashSet<String> = HashSet::new();
    let mut edges = Vec::with_capacity(doc.edges.len());
    for record in &doc.edges {
        let source = record.from.trim();
        let target = record.to.trim();
        if source.is_empty() || target.is_empty() || !seen.contains(source) || !seen.contains(target) {
            debug!(edge_id = %record.id, from = source, to = target, "edge endpoint unresolved; record dropped");
            report.dropped_edges += 1;
            continue;
        }
        let mut id = record.id.clone();
        if id.trim().is_empty() || edge_ids.contains(&id) {
            report.repaired += 1;
            id = new_edge_id();
        }
        edge_ids.insert(id.clone());
        let width = match record.width {
            Some(w) if is_positive_finite(w) => w,
            Some(_) => {
                report.repaired += 1;
                DEFAULT_EDGE_WIDTH
            }
            None => DEFAULT_EDGE_WIDTH,
        };
        let badge = record
            .badge_text
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|text| Badge {
                text: text.clone(),
                color: record.badge_color.clone().filter(|c| !c.is_empty()),
                background: record.badge_bg.clone().filter(|c| !c.is_empty()),
            });
        edges.push(Edge {
            id,
            source: source.to_string(),
            target: target.to_string(),
            label: record.label.clone().filter(|l| !l.is_empty()),
            kind: record.kind.unwrap_or_default(),
            color: non_empty_or(record.color.as_deref(), DEFAULT_EDGE_COLOR),
            width,
            badge,
        });
    }

    let legend = doc
        .legend
        .iter()
        .map(|l| LegendItem {
            key: l.key.clone(),
            label: l.label.clone(),
            color: non_empty_or(l.color.as_deref(), DEFAULT_LEGEND_COLOR),
            background: l.background.clone().filter(|b| !b.is_empty()),
        })
        .collect();

    let entry_node_id = doc
        .entry_node_id
        .as_deref()
        .map(str::trim)
        .filter(|id| seen.contains(*id))
        .map(str::to_string);
    if doc.entry_node_id.is_some() && entry_node_id.is_none() {
        report.repaired += 1;
    }

    (Diagram { entry_node_id, graph: Graph::new(nodes, edges), legend }, report)
}

// =============================================================================
// DECODE: JSON -> DOCUMENT
// =============================================================================

/// Parse and decode a JSON string.
///
/// # Errors
///
/// Returns `Json` for unparsable input and `NotAnObject` for a non-object root.
pub fn decode_str(raw: &str) -> Result<(Diagram, DecodeReport), CodecError> {
    let value: Value = serde_json::from_str(raw)?;
    decode_value(&value)
}

/// Decode an arbitrary JSON value, degrading malformed records.
///
/// # Errors
///
/// Returns `NotAnObject` when the root is not a JSON object.
pub fn decode_value(value: &Value) -> Result<(Diagram, DecodeReport), CodecError> {
    let (doc, repaired) = document_from_value(value)?;
    let (diagram, mut report) = decode(&doc);
    report.repaired += repaired;
    if !report.is_clean() {
        warn!(
            repaired = report.repaired,
            dropped_nodes = report.dropped_nodes,
            dropped_edges = report.dropped_edges,
            "document decoded with degraded records"
        );
    }
    Ok((diagram, report))
}

/// Lenient JSON → `Document`. Returns the document and the number of records repaired.
fn document_from_value(value: &Value) -> Result<(Document, usize), CodecError> {
    if !value.is_object() {
        return Err(CodecError::NotAnObject);
    }
    let root = Record::new(value);
    let mut repaired = 0;

    let nodes = root
        .array("nodes")
        .iter()
        .map(|v| {
            let (node, fixed) = node_from_value(v);
            repaired += usize::from(fixed);
            node
        })
        .collect();

    let edges = root
        .array("edges")
        .iter()
        .map(|v| {
            let (edge, fixed) = edge_from_value(v);
            repaired += usize::from(fixed);
            edge
        })
        .collect();

    let legend = root
        .array("legend")
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let (item, fixed) = legend_from_value(i, v);
            repaired += usize::from(fixed);
            item
        })
        .collect();

    let doc = Document { entry_node_id: root.string_like(&["entryNodeId"]), nodes, edges, legend };
    Ok((doc, repaired))
}

fn node_from_value(value: &Value) -> (DocumentNode, bool) {
    let rec = Record::new(value);
    let mut fixed = !value.is_object();

    let id = rec.string_like(&["id"]).unwrap_or_else(|| {
        fixed = true;
        new_node_id()
    });

    let shape_kind = match rec.get(&["shapeKind", "shape", "type"]) {
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            fixed = true;
            String::new()
        }
        None => String::new(),
    };

    let position = match rec.object("position") {
        Some(pos) => match (pos.number("x"), pos.number("y")) {
            (Some(x), Some(y)) => Point::new(x, y),
            (x, y) => {
                fixed = true;
                Point::new(x.unwrap_or(0.0), y.unwrap_or(0.0))
            }
        },
        None => {
            fixed = true;
            Point::default()
        }
    };

    let style = rec.object("style").map(|s| NodeStyle {
        fill_color: s.text(&["fillColor", "fill"]),
        stroke_color: s.text(&["strokeColor", "stroke"]),
        text_color: s.text(&["textColor", "color"]),
        width: s.number("width"),
        height: s.number("height"),
        font_size: s.number("fontSize"),
    });

    let interaction = rec.object("interaction").and_then(|i| {
        let kind = match i.text(&["type", "kind"]).as_deref() {
            Some("navigate-to-process" | "process") => InteractionKind::NavigateToProcess,
            Some("open-url" | "url") => InteractionKind::OpenUrl,
            Some("show-tooltip" | "tooltip") => InteractionKind::ShowTooltip,
            _ => {
                fixed = true;
                return None;
            }
        };
        let target = i.string_like(&["target"]).unwrap_or_default();
        Some(Interaction { kind, target })
    });

    let node = DocumentNode {
        id,
        source_ref: rec.string_like(&["sourceRef"]),
        shape_kind,
        label: rec.text(&["label"]).unwrap_or_default(),
        position,
        style,
        interaction,
    };
    (node, fixed)
}

fn edge_from_value(value: &Value) -> (DocumentEdge, bool) {
    let rec = Record::new(value);
    let mut fixed = false;

    let id = rec.string_like(&["id"]).unwrap_or_else(|| {
        fixed = true;
        new_edge_id()
    });

    let kind = match rec.text(&["kind"]) {
        Some(raw) => EdgeKind::from_key(&raw).or_else(|| {
            fixed = true;
            None
        }),
        None => None,
    };

    let edge = DocumentEdge {
        id,
        from: rec.string_like(&["from", "source"]).unwrap_or_default(),
        to: rec.string_like(&["to", "target"]).unwrap_or_default(),
        label: rec.text(&["label"]),
        kind,
        color: rec.text(&["color"]),
        width: rec.number("width"),
        badge_text: rec.text(&["badgeText"]),
        badge_color: rec.text(&["badgeColor"]),
        badge_bg: rec.text(&["badgeBg"]),
    };
    (edge, fixed)
}

fn legend_from_value(index: usize, value: &Value) -> (DocumentLegendItem, bool) {
    let rec = Record::new(value);
    let label = rec.text(&["label"]).unwrap_or_default();
    let (key, fixed) = match rec.string_like(&["key"]) {
        Some(key) => (key, false),
        None => (format!("legend-{index}"), true),
    };
    let item = DocumentLegendItem {
        key,
        label,
        color: rec.text(&["color"]),
        background: rec.text(&["background", "bg"]),
    };
    (item, fixed)
}

fn non_empty_or(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

// =============================================================================
// LENIENT ACCESSOR
// =============================================================================

/// Typed, forgiving access to one JSON record.
struct Record<'a> {
    value: &'a Value,
}

impl<'a> Record<'a> {
    fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// First present, non-null value among `keys`.
    fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|k| self.value.get(*k))
            .find(|v| !v.is_null())
    }

    fn object(&self, key: &str) -> Option<Record<'a>> {
        self.value.get(key).filter(|v| v.is_object()).map(Record::new)
    }

    fn array(&self, key: &str) -> &'a [Value] {
        match self.value.get(key).and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => &[],
        }
    }

    /// Non-empty string field.
    fn text(&self, keys: &[&str]) -> Option<String> {
        self.get(keys)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Non-empty string, or a number rendered as a string.
    fn string_like(&self, keys: &[&str]) -> Option<String> {
        match self.get(keys)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Finite number, accepting numeric strings.
    fn number(&self, key: &str) -> Option<f64> {
        let raw = match self.value.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => None,
            },
            _ => None,
        };
        raw.filter(|v| v.is_finite())
    }
}
