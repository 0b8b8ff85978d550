//! Editor controller: owns the diagram state and routes every operation.
//!
//! DESIGN
//! ======
//! `DiagramEditor` is the only owner of the live graph, the legend, the
//! selection, the history, the connect-mode machine and the pointer
//! gesture. Every public operation runs to completion synchronously and
//! returns the [`Action`]s the host should react to. History is committed
//! here and nowhere else, once per discrete user-visible mutation: a drag
//! moves nodes live on every pointer move and commits once on release.
//!
//! The legend and the entry node are document metadata outside the undo
//! snapshots. Editing them marks the document dirty without a history
//! entry.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here fails the session. Invalid requests (unknown ids, self
//! loops, duplicate edges, empty selections) are no-ops that return no
//! actions. Save failures become notifications and leave local state as is.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashSet;
use std::mem;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::arrange::{self, AlignKind, DistributeAxis};
use crate::codec::{self, CodecError, DecodeReport, Diagram, Document};
use crate::commands::{self, ClipboardSnapshot, PasteResult};
use crate::config::EditorConfig;
use crate::connect::{ConnectMode, ConnectState, ConnectStep};
use crate::error::ErrorCode;
use crate::geom::{Bounds, Point};
use crate::guides::{Guide, Target, snap_bounds};
use crate::hit;
use crate::history::History;
use crate::input::{Button, InputState, Key, Modifiers};
use crate::model::{
    Badge, Edge, EdgeId, EdgeKind, Graph, Interaction, LegendItem, Node, NodeId, NodeStyle, is_positive_finite,
    new_edge_id,
};
use crate::persist::{Notification, Notifications, PersistenceService, SaveError, SaveStatus, SaveTicket};
use crate::shape::ShapeKind;
use crate::sync::{StepRecord, sync_nodes};

// =============================================================================
// TYPES
// =============================================================================

/// Actions returned from editor operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Graph, selection or guides changed; redraw.
    RenderNeeded,
    /// Alignment guides to draw now (empty clears them).
    GuidesChanged(Vec<Guide>),
    /// Node or edge selection changed.
    SelectionChanged,
    /// Undo/redo availability after a history change.
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// Connect mode or its pending source changed.
    ConnectModeChanged { mode: ConnectMode, pending: Option<NodeId> },
    /// A node mirroring an external step was activated; highlight that step.
    RowFocused { node: NodeId, source_ref: String },
    /// A node carrying an interaction was activated.
    InteractionRequested { node: NodeId, interaction: Interaction },
}

/// Everything the controller owns about the open document.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub graph: Graph,
    pub legend: Vec<LegendItem>,
    pub entry_node_id: Option<NodeId>,
    pub selected_nodes: HashSet<NodeId>,
    pub selected_edges: HashSet<EdgeId>,
    /// Guides of the drag in progress.
    pub guides: Vec<Guide>,
    /// Unsaved edits exist.
    pub dirty: bool,
    /// Bumped on every mutation; save tickets compare against it.
    pub revision: u64,
}

/// Controller for one open flowchart.
#[derive(Debug)]
pub struct DiagramEditor {
    config: EditorConfig,
    state: EditorState,
    history: History,
    connect: ConnectState,
    input: InputState,
    clipboard: Option<ClipboardSnapshot>,
    /// Pastes of the current clipboard so far; scales the paste offset.
    paste_count: u32,
    notifications: Notifications,
}

impl Default for DiagramEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl DiagramEditor {
    /// Empty editor. The empty graph is the history base.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let mut history = History::new(config.history_limit);
        history.seed(&Graph::default());
        Self {
            config,
            state: EditorState::default(),
            history,
            connect: ConnectState::default(),
            input: InputState::Idle,
            clipboard: None,
            paste_count: 0,
            notifications: Notifications::default(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.state.graph
    }

    #[must_use]
    pub fn legend(&self) -> &[LegendItem] {
        &self.state.legend
    }

    #[must_use]
    pub fn entry_node_id(&self) -> Option<&str> {
        self.state.entry_node_id.as_deref()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    #[must_use]
    pub fn guides(&self) -> &[Guide] {
        &self.state.guides
    }

    #[must_use]
    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    /// Selected node ids in paint order.
    #[must_use]
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.state
            .graph
            .nodes
            .iter()
            .filter(|n| self.state.selected_nodes.contains(&n.id))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Selected edge ids in paint order.
    #[must_use]
    pub fn selected_edges(&self) -> Vec<EdgeId> {
        self.state
            .graph
            .edges
            .iter()
            .filter(|e| self.state.selected_edges.contains(&e.id))
            .map(|e| e.id.clone())
            .collect()
    }

    #[must_use]
    pub fn is_node_selected(&self, id: &str) -> bool {
        self.state.selected_nodes.contains(id)
    }

    #[must_use]
    pub fn connect_mode(&self) -> ConnectMode {
        self.connect.mode()
    }

    #[must_use]
    pub fn pending_source(&self) -> Option<&str> {
        self.connect.pending()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn clipboard(&self) -> Option<&ClipboardSnapshot> {
        self.clipboard.as_ref()
    }

    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        self.notifications.list()
    }

    /// Close notification `id`. Returns whether it was open.
    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        self.notifications.dismiss(id)
    }

    /// Top-most node under `pt`.
    #[must_use]
    pub fn node_at(&self, pt: Point) -> Option<&Node> {
        hit::node_at(&self.state.graph.nodes, pt)
    }

    /// Edge under `pt`, within the configured hit slop.
    #[must_use]
    pub fn edge_at(&self, pt: Point) -> Option<&Edge> {
        hit::edge_at(&self.state.graph, pt, self.config.edge_hit_slop)
    }

    // =========================================================================
    // LOAD / SAVE
    // =========================================================================

    /// Replace the open document. Resets selection, connect mode and history.
    pub fn load(&mut self, document: &Document) -> DecodeReport {
        let (diagram, report) = codec::decode(document);
        self.install(diagram, report);
        report
    }

    /// Load from an untyped JSON payload.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if the payload is not a JSON object; the
    /// open document is left untouched.
    pub fn load_value(&mut self, value: &Value) -> Result<DecodeReport, CodecError> {
        let (diagram, report) = codec::decode_value(value)?;
        self.install(diagram, report);
        Ok(report)
    }

    /// Load from raw JSON text.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if the text is not a JSON object.
    pub fn load_str(&mut self, raw: &str) -> Result<DecodeReport, CodecError> {
        let (diagram, report) = codec::decode_str(raw)?;
        self.install(diagram, report);
        Ok(report)
    }

    fn install(&mut self, diagram: Diagram, report: DecodeReport) {
        let Diagram { entry_node_id, graph, legend } = diagram;
        self.history.seed(&graph);
        self.state.graph = graph;
        self.state.legend = legend;
        self.state.entry_node_id = entry_node_id;
        self.state.selected_nodes.clear();
        self.state.selected_edges.clear();
        self.state.guides.clear();
        self.state.dirty = false;
        self.state.revision += 1;
        self.connect.exit();
        self.input = InputState::Idle;
        info!(
            nodes = self.state.graph.nodes.len(),
            edges = self.state.graph.edges.len(),
            legend = self.state.legend.len(),
            repaired = report.repaired,
            dropped_nodes = report.dropped_nodes,
            dropped_edges = report.dropped_edges,
            "document loaded"
        );
    }

    /// Persisted form of the current state.
    #[must_use]
    pub fn document(&self) -> Document {
        codec::encode(&Diagram {
            entry_node_id: self.state.entry_node_id.clone(),
            graph: self.state.graph.clone(),
            legend: self.state.legend.clone(),
        })
    }

    /// Capture the document for a save without blocking further edits.
    #[must_use]
    pub fn prepare_save(&self) -> SaveTicket {
        SaveTicket { revision: self.state.revision, document: self.document() }
    }

    /// Apply the outcome of a save started with [`Self::prepare_save`].
    ///
    /// Success clears the dirty flag only if nothing changed since the
    /// ticket was taken. Failure raises a notification and keeps every
    /// local edit.
    pub fn complete_save(&mut self, ticket: &SaveTicket, result: Result<(), SaveError>) -> SaveStatus {
        match result {
            Ok(()) if ticket.revision == self.state.revision => {
                self.state.dirty = false;
                info!(revision = ticket.revision, "document saved");
                SaveStatus::Saved
            }
            Ok(()) => {
                info!(
                    saved_revision = ticket.revision,
                    current_revision = self.state.revision,
                    "document saved; newer edits still pending"
                );
                SaveStatus::Stale
            }
            Err(err) => {
                warn!(error = %err, code = err.error_code(), revision = ticket.revision, "document save failed");
                let id = self.notifications.push(&err);
                SaveStatus::Failed { notification: id }
            }
        }
    }

    /// Save through `service` for `process_id`.
    pub async fn save(&mut self, service: &dyn PersistenceService, process_id: &str) -> SaveStatus {
        let ticket = self.prepare_save();
        info!(
            process_id,
            revision = ticket.revision,
            nodes = ticket.document.nodes.len(),
            edges = ticket.document.edges.len(),
            "saving document"
        );
        let result = service.save_document(process_id, &ticket.document).await;
        self.complete_save(&ticket, result)
    }

    // =========================================================================
    // SYNC
    // =========================================================================

    /// Refresh the step-backed nodes from the external step list.
    ///
    /// Commits one `"sync"` history entry only when something changed.
    pub fn sync_steps(&mut self, steps: &[StepRecord]) -> Vec<Action> {
        let outcome = sync_nodes(&self.state.graph.nodes, steps, &self.config.layout);
        if !outcome.changed {
            debug!(steps = steps.len(), "step sync: no change");
            return Vec::new();
        }
        self.state.graph.nodes = outcome.nodes;
        let dropped_edges = self.state.graph.prune_dangling_edges();
        info!(
            steps = steps.len(),
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            dropped_edges = dropped_edges.len(),
            "steps synchronised"
        );
        let mut actions = self.reconcile();
        actions.extend(self.commit("sync"));
        actions
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Select node `id`. Additive toggles it in the current selection.
    pub fn select_node(&mut self, id: &str, additive: bool) -> Vec<Action> {
        if !self.state.graph.contains_node(id) {
            return Vec::new();
        }
        let mut nodes = if additive { self.state.selected_nodes.clone() } else { HashSet::new() };
        let edges = if additive { self.state.selected_edges.clone() } else { HashSet::new() };
        if !nodes.remove(id) {
            nodes.insert(id.to_string());
        }
        self.replace_selection(nodes, edges)
    }

    /// Select edge `id`. Additive toggles it in the current selection.
    pub fn select_edge(&mut self, id: &str, additive: bool) -> Vec<Action> {
        if self.state.graph.edge(id).is_none() {
            return Vec::new();
        }
        let nodes = if additive { self.state.selected_nodes.clone() } else { HashSet::new() };
        let mut edges = if additive { self.state.selected_edges.clone() } else { HashSet::new() };
        if !edges.remove(id) {
            edges.insert(id.to_string());
        }
        self.replace_selection(nodes, edges)
    }

    /// Select exactly the given nodes (unknown ids are ignored).
    pub fn set_selection<I, S>(&mut self, ids: I) -> Vec<Action>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let nodes = ids
            .into_iter()
            .filter(|id| self.state.graph.contains_node(id.as_ref()))
            .map(|id| id.as_ref().to_string())
            .collect();
        self.replace_selection(nodes, HashSet::new())
    }

    pub fn select_all(&mut self) -> Vec<Action> {
        let nodes = self.state.graph.node_ids();
        self.replace_selection(nodes, HashSet::new())
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        self.replace_selection(HashSet::new(), HashSet::new())
    }

    fn replace_selection(&mut self, nodes: HashSet<NodeId>, edges: HashSet<EdgeId>) -> Vec<Action> {
        if nodes == self.state.selected_nodes && edges == self.state.selected_edges {
            return Vec::new();
        }
        self.state.selected_nodes = nodes;
        self.state.selected_edges = edges;
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    // =========================================================================
    // POINTER / KEYBOARD
    // =========================================================================

    /// Pointer pressed at world position `pt`.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        if let Some(node) = hit::node_at(&self.state.graph.nodes, pt) {
            self.input = InputState::PressingNode { id: node.id.clone(), start: pt, modifiers };
            return Vec::new();
        }
        if !self.connect.is_active() {
            if let Some(edge) = hit::edge_at(&self.state.graph, pt, self.config.edge_hit_slop) {
                let id = edge.id.clone();
                self.input = InputState::Idle;
                return self.select_edge(&id, modifiers.additive());
            }
        }
        self.input = InputState::PressingCanvas { start: pt };
        Vec::new()
    }

    /// Pointer moved to world position `pt`.
    pub fn on_pointer_move(&mut self, pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        match &self.input {
            InputState::PressingNode { id, start, modifiers } => {
                if self.connect.is_active() || start.distance(pt) <= self.config.drag_threshold {
                    return Vec::new();
                }
                let (id, start, additive) = (id.clone(), *start, modifiers.additive());
                let mut actions = self.start_drag(&id, start, additive);
                actions.extend(self.drag_to(pt));
                actions
            }
            InputState::DraggingNodes { .. } => self.drag_to(pt),
            InputState::Idle | InputState::PressingCanvas { .. } => Vec::new(),
        }
    }

    /// Pointer released. A press that never became a drag is a click.
    pub fn on_pointer_up(&mut self, _pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        match mem::take(&mut self.input) {
            InputState::PressingNode { id, modifiers, .. } => self.click_node(&id, modifiers),
            InputState::PressingCanvas { .. } => self.click_canvas(),
            dragging @ InputState::DraggingNodes { .. } => {
                self.input = dragging;
                self.end_drag()
            }
            InputState::Idle => Vec::new(),
        }
    }

    /// Key pressed.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        match key.as_str() {
            "Escape" => return self.escape(),
            "Delete" | "Backspace" => return self.delete_selection(),
            _ => {}
        }
        if modifiers.command() {
            return match key.normalized().as_str() {
                "z" if modifiers.shift => self.redo(),
                "z" => self.undo(),
                "y" => self.redo(),
                "c" => {
                    self.copy();
                    Vec::new()
                }
                "x" => self.cut(),
                "v" => self.paste(),
                "d" => self.duplicate(),
                "a" => self.select_all(),
                _ => Vec::new(),
            };
        }
        if let Some((ux, uy)) = key.arrow_direction() {
            let step = if modifiers.shift { self.config.nudge_step_large } else { self.config.nudge_step };
            return self.nudge(ux * step, uy * step);
        }
        Vec::new()
    }

    /// Node `id` clicked: connect-mode step, or selection plus activation.
    pub fn click_node(&mut self, id: &str, modifiers: Modifiers) -> Vec<Action> {
        if !self.state.graph.contains_node(id) {
            return Vec::new();
        }
        if self.connect.is_active() {
            return self.connect_click(id);
        }
        let additive = modifiers.additive();
        let mut actions = self.select_node(id, additive);
        if additive {
            return actions;
        }
        if let Some(node) = self.state.graph.node(id) {
            if let Some(source_ref) = &node.source_ref {
                actions.push(Action::RowFocused { node: node.id.clone(), source_ref: source_ref.clone() });
            }
            if let Some(interaction) = &node.interaction {
                actions.push(Action::InteractionRequested { node: node.id.clone(), interaction: interaction.clone() });
            }
        }
        actions
    }

    /// Empty canvas clicked: leave connect mode, else clear the selection.
    pub fn click_canvas(&mut self) -> Vec<Action> {
        if self.connect.is_active() {
            return self.exit_connect_mode();
        }
        self.clear_selection()
    }

    fn escape(&mut self) -> Vec<Action> {
        if self.connect.is_active() {
            return self.exit_connect_mode();
        }
        if self.input.is_dragging() {
            return self.cancel_drag();
        }
        self.clear_selection()
    }

    // =========================================================================
    // DRAG
    // =========================================================================

    /// Start dragging node `id` from world position `pointer`.
    ///
    /// Dragging a selected node moves the whole selection; dragging an
    /// unselected node selects it alone first. Ignored in connect mode.
    pub fn begin_drag(&mut self, id: &str, pointer: Point) -> Vec<Action> {
        if self.connect.is_active() {
            return Vec::new();
        }
        self.start_drag(id, pointer, false)
    }

    fn start_drag(&mut self, id: &str, start: Point, additive: bool) -> Vec<Action> {
        if !self.state.graph.contains_node(id) {
            return Vec::new();
        }
        let actions = if self.state.selected_nodes.contains(id) { Vec::new() } else { self.select_node(id, additive) };
        let origins: Vec<(NodeId, Point)> = self
            .state
            .graph
            .nodes
            .iter()
            .filter(|n| self.state.selected_nodes.contains(&n.id))
            .map(|n| (n.id.clone(), n.position))
            .collect();
        debug!(grabbed = id, moving = origins.len(), "drag started");
        self.input = InputState::DraggingNodes { grabbed: id.to_string(), start, origins };
        actions
    }

    /// Move the dragged nodes so the grabbed node follows `pointer`, snapped
    /// against the nodes that are not moving.
    pub fn drag_to(&mut self, pointer: Point) -> Vec<Action> {
        let InputState::DraggingNodes { grabbed, start, origins } = &self.input else {
            return Vec::new();
        };
        let dx = pointer.x - start.x;
        let dy = pointer.y - start.y;
        let Some(grab_origin) = origins.iter().find(|(id, _)| id == grabbed).map(|(_, p)| *p) else {
            return Vec::new();
        };
        let Some(grabbed_node) = self.state.graph.node(grabbed) else {
            return Vec::new();
        };
        let candidate = Bounds::from_origin(grab_origin.offset(dx, dy), grabbed_node.width(), grabbed_node.height());

        let moving: HashSet<&str> = origins.iter().map(|(id, _)| id.as_str()).collect();
        let targets: Vec<Target<'_>> = self
            .state
            .graph
            .nodes
            .iter()
            .filter(|n| !moving.contains(n.id.as_str()))
            .map(|n| Target { id: &n.id, bounds: n.bounds() })
            .collect();
        let snap = snap_bounds(&candidate, &targets, &self.config.guides);

        let moves: Vec<(NodeId, Point)> =
            origins.iter().map(|(id, origin)| (id.clone(), origin.offset(dx + snap.dx, dy + snap.dy))).collect();
        for (id, position) in moves {
            if let Some(node) = self.state.graph.node_mut(&id) {
                node.position = position;
            }
        }

        let mut actions = Vec::new();
        if snap.guides != self.state.guides {
            self.state.guides.clone_from(&snap.guides);
            actions.push(Action::GuidesChanged(snap.guides));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Finish the drag: clear guides and commit one `"move"` entry.
    pub fn end_drag(&mut self) -> Vec<Action> {
        if !self.input.is_dragging() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        let mut actions = self.clear_guides();
        actions.extend(self.commit("move"));
        actions
    }

    /// Abort the drag and put every moved node back.
    pub fn cancel_drag(&mut self) -> Vec<Action> {
        if !self.input.is_dragging() {
            return Vec::new();
        }
        let InputState::DraggingNodes { origins, .. } = mem::take(&mut self.input) else {
            return Vec::new();
        };
        for (id, origin) in origins {
            if let Some(node) = self.state.graph.node_mut(&id) {
                node.position = origin;
            }
        }
        let mut actions = self.clear_guides();
        actions.push(Action::RenderNeeded);
        actions
    }

    fn clear_guides(&mut self) -> Vec<Action> {
        if self.state.guides.is_empty() {
            return Vec::new();
        }
        self.state.guides.clear();
        vec![Action::GuidesChanged(Vec::new())]
    }

    /// Move the selection by `(dx, dy)` as one `"nudge"` entry.
    pub fn nudge(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        if self.state.selected_nodes.is_empty() {
            return Vec::new();
        }
        for node in &mut self.state.graph.nodes {
            if self.state.selected_nodes.contains(&node.id) {
                node.position = node.position.offset(dx, dy);
            }
        }
        self.commit("nudge")
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Copy the selected nodes and their internal edges to the clipboard.
    ///
    /// Returns `false` (clipboard untouched) when nothing is selected.
    pub fn copy(&mut self) -> bool {
        let snapshot = commands::copy(&self.state.graph, &self.state.selected_nodes);
        if snapshot.is_empty() {
            return false;
        }
        debug!(nodes = snapshot.nodes.len(), edges = snapshot.edges.len(), "selection copied");
        self.clipboard = Some(snapshot);
        self.paste_count = 0;
        true
    }

    /// Copy then delete the selection, as one `"cut"` entry.
    pub fn cut(&mut self) -> Vec<Action> {
        if !self.copy() {
            return Vec::new();
        }
        self.remove_selection("cut")
    }

    /// Paste the clipboard. Each further paste of the same clipboard lands
    /// one more offset step away.
    pub fn paste(&mut self) -> Vec<Action> {
        let Some(snapshot) = self.clipboard.as_ref() else {
            return Vec::new();
        };
        self.paste_count += 1;
        let offset = self.config.paste_offset * f64::from(self.paste_count);
        let mut taken = self.state.graph.node_ids();
        taken.extend(self.state.graph.edge_ids());
        let pasted = commands::paste(snapshot, offset, offset, &taken);
        self.insert_pasted(pasted, "paste")
    }

    /// Copy and paste the selection without touching the clipboard.
    pub fn duplicate(&mut self) -> Vec<Action> {
        let offset = self.config.paste_offset;
        let pasted = commands::duplicate(&self.state.graph, &self.state.selected_nodes, offset, offset);
        self.insert_pasted(pasted, "duplicate")
    }

    fn insert_pasted(&mut self, pasted: PasteResult, reason: &str) -> Vec<Action> {
        if pasted.nodes.is_empty() {
            return Vec::new();
        }
        let ids: HashSet<NodeId> = pasted.nodes.iter().map(|n| n.id.clone()).collect();
        debug!(reason, nodes = pasted.nodes.len(), edges = pasted.edges.len(), "nodes inserted");
        self.state.graph.nodes.extend(pasted.nodes);
        self.state.graph.edges.extend(pasted.edges);
        let mut actions = self.replace_selection(ids, HashSet::new());
        actions.extend(self.commit(reason));
        actions
    }

    /// Delete the selected nodes (cascading to their edges) and edges.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        self.remove_selection("delete")
    }

    fn remove_selection(&mut self, reason: &str) -> Vec<Action> {
        let outcome = commands::delete(&mut self.state.graph, &self.state.selected_nodes, &self.state.selected_edges);
        if outcome.is_empty() {
            return Vec::new();
        }
        debug!(reason, nodes = outcome.nodes.len(), edges = outcome.edges.len(), "selection removed");
        let mut actions = self.reconcile();
        actions.extend(self.commit(reason));
        actions
    }

    // =========================================================================
    // ARRANGE
    // =========================================================================

    /// Align the selection (two nodes or more).
    pub fn align(&mut self, kind: AlignKind) -> Vec<Action> {
        let moved = arrange::align(&mut self.state.graph.nodes, &self.state.selected_nodes, kind, self.config.grid_unit);
        if moved == 0 {
            return Vec::new();
        }
        self.commit(kind.reason())
    }

    /// Distribute the selection (three nodes or more).
    pub fn distribute(&mut self, axis: DistributeAxis) -> Vec<Action> {
        let moved =
            arrange::distribute(&mut self.state.graph.nodes, &self.state.selected_nodes, axis, self.config.grid_unit);
        if moved == 0 {
            return Vec::new();
        }
        self.commit(axis.reason())
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    pub fn undo(&mut self) -> Vec<Action> {
        let Some(restored) = self.history.undo() else {
            return Vec::new();
        };
        debug!(reason = %restored.reason, "undo");
        self.restore(restored.graph)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let Some(restored) = self.history.redo() else {
            return Vec::new();
        };
        debug!(reason = %restored.reason, "redo");
        self.restore(restored.graph)
    }

    fn restore(&mut self, graph: Graph) -> Vec<Action> {
        self.state.graph = graph;
        self.input = InputState::Idle;
        let mut actions = self.clear_guides();
        if self.connect.disarm().is_some() {
            actions.push(self.connect_action());
        }
        actions.extend(self.reconcile());
        self.touch();
        actions.push(self.history_action());
        actions.push(Action::RenderNeeded);
        actions
    }

    fn commit(&mut self, reason: &str) -> Vec<Action> {
        if !self.history.commit(reason, &self.state.graph) {
            return Vec::new();
        }
        self.touch();
        debug!(reason, depth = self.history.undo_depth(), "history commit");
        vec![self.history_action(), Action::RenderNeeded]
    }

    fn touch(&mut self) {
        self.state.dirty = true;
        self.state.revision += 1;
    }

    fn history_action(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }

    /// Drop selection, entry node and pending source entries that no longer
    /// resolve after nodes or edges went away.
    fn reconcile(&mut self) -> Vec<Action> {
        let nodes = self.state.graph.node_ids();
        let edges = self.state.graph.edge_ids();
        let before = (self.state.selected_nodes.len(), self.state.selected_edges.len());
        self.state.selected_nodes.retain(|id| nodes.contains(id));
        self.state.selected_edges.retain(|id| edges.contains(id));
        if self.state.entry_node_id.as_ref().is_some_and(|id| !nodes.contains(id)) {
            debug!("entry node removed");
            self.state.entry_node_id = None;
        }
        self.connect.retain_pending(|id| nodes.contains(id));
        self.sync_source_flag();
        if before == (self.state.selected_nodes.len(), self.state.selected_edges.len()) {
            Vec::new()
        } else {
            vec![Action::SelectionChanged]
        }
    }

    // =========================================================================
    // CONNECT
    // =========================================================================

    /// Enter `mode` (or leave with [`ConnectMode::Off`]). Clears the
    /// selection and any pending source.
    pub fn set_connect_mode(&mut self, mode: ConnectMode) -> Vec<Action> {
        self.connect.enter(mode);
        self.input = InputState::Idle;
        self.sync_source_flag();
        debug!(mode = mode.as_str(), "connect mode set");
        let mut actions = self.clear_guides();
        actions.extend(self.clear_selection());
        actions.push(self.connect_action());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Leave connect mode.
    pub fn exit_connect_mode(&mut self) -> Vec<Action> {
        if !self.connect.exit() {
            return Vec::new();
        }
        self.sync_source_flag();
        debug!("connect mode exited");
        vec![self.connect_action(), Action::RenderNeeded]
    }

    /// Create edge `source → target`, as one `"connect"` entry.
    ///
    /// No-op for self loops, unknown nodes and pairs already connected in
    /// that direction.
    pub fn connect(&mut self, source: &str, target: &str) -> Vec<Action> {
        if source == target {
            debug!(source, "self loop rejected");
            return Vec::new();
        }
        if !self.state.graph.contains_node(source) || !self.state.graph.contains_node(target) {
            debug!(source, target, "connect with unknown node ignored");
            return Vec::new();
        }
        if self.state.graph.has_edge(source, target) {
            debug!(source, target, "edge already exists");
            return Vec::new();
        }
        self.state.graph.edges.push(Edge::new(new_edge_id(), source, target));
        self.commit("connect")
    }

    fn connect_click(&mut self, id: &str) -> Vec<Action> {
        let mut actions = match self.connect.click_node(id) {
            ConnectStep::Inactive => return Vec::new(),
            ConnectStep::Armed(_) | ConnectStep::Disarmed(_) => Vec::new(),
            ConnectStep::Connect { source, target } => self.connect(&source, &target),
        };
        self.sync_source_flag();
        actions.push(self.connect_action());
        actions.push(Action::RenderNeeded);
        actions
    }

    fn connect_action(&self) -> Action {
        Action::ConnectModeChanged { mode: self.connect.mode(), pending: self.connect.pending().map(str::to_string) }
    }

    fn sync_source_flag(&mut self) {
        let pending = self.connect.pending().map(str::to_string);
        self.state.graph.set_selection_source(pending.as_deref());
    }

    // =========================================================================
    // NODE / EDGE EDITS
    // =========================================================================

    pub fn set_node_label(&mut self, id: &str, label: impl Into<String>) -> Vec<Action> {
        let label = label.into();
        self.edit_node(id, "edit-label", |n| n.label = label)
    }

    pub fn set_node_shape(&mut self, id: &str, shape: ShapeKind) -> Vec<Action> {
        self.edit_node(id, "edit-shape", |n| n.shape = shape)
    }

    /// Replace the node's style; non-finite or non-positive sizes are dropped.
    pub fn set_node_style(&mut self, id: &str, style: NodeStyle) -> Vec<Action> {
        let style = style.sanitized();
        self.edit_node(id, "edit-style", |n| n.style = style)
    }

    pub fn set_node_interaction(&mut self, id: &str, interaction: Option<Interaction>) -> Vec<Action> {
        self.edit_node(id, "edit-interaction", |n| n.interaction = interaction)
    }

    fn edit_node(&mut self, id: &str, reason: &str, edit: impl FnOnce(&mut Node)) -> Vec<Action> {
        let Some(node) = self.state.graph.node_mut(id) else {
            return Vec::new();
        };
        edit(node);
        self.commit(reason)
    }

    /// Set the edge label; an empty label removes it.
    pub fn set_edge_label(&mut self, id: &str, label: Option<String>) -> Vec<Action> {
        let label = label.filter(|l| !l.is_empty());
        self.edit_edge(id, "edit-edge-label", |e| e.label = label)
    }

    pub fn set_edge_kind(&mut self, id: &str, kind: EdgeKind) -> Vec<Action> {
        self.edit_edge(id, "edit-edge-kind", |e| e.kind = kind)
    }

    /// Set the edge color; an empty color ignores the request.
    pub fn set_edge_color(&mut self, id: &str, color: impl Into<String>) -> Vec<Action> {
        let color = color.into();
        if color.trim().is_empty() {
            return Vec::new();
        }
        self.edit_edge(id, "edit-edge-color", |e| e.color = color)
    }

    /// Set the stroke width; non-finite or non-positive widths are ignored.
    pub fn set_edge_width(&mut self, id: &str, width: f64) -> Vec<Action> {
        if !is_positive_finite(width) {
            return Vec::new();
        }
        self.edit_edge(id, "edit-edge-width", |e| e.width = width)
    }

    /// Set or remove the midpoint badge; a badge without text removes it.
    pub fn set_edge_badge(&mut self, id: &str, badge: Option<Badge>) -> Vec<Action> {
        let badge = badge.filter(|b| !b.text.is_empty());
        self.edit_edge(id, "edit-edge-badge", |e| e.badge = badge)
    }

    fn edit_edge(&mut self, id: &str, reason: &str, edit: impl FnOnce(&mut Edge)) -> Vec<Action> {
        let Some(edge) = self.state.graph.edge_mut(id) else {
            return Vec::new();
        };
        edit(edge);
        self.commit(reason)
    }

    // =========================================================================
    // DOCUMENT METADATA
    // =========================================================================

    /// Designate the entry node (or none). Unknown ids are ignored.
    pub fn set_entry_node(&mut self, id: Option<&str>) -> Vec<Action> {
        if id.is_some_and(|id| !self.state.graph.contains_node(id)) {
            return Vec::new();
        }
        if self.state.entry_node_id.as_deref() == id {
            return Vec::new();
        }
        self.state.entry_node_id = id.map(str::to_string);
        self.touch();
        vec![Action::RenderNeeded]
    }

    /// Add a legend entry. Empty or already-used keys are rejected.
    pub fn add_legend_item(&mut self, item: LegendItem) -> Vec<Action> {
        if item.key.is_empty() || self.state.legend.iter().any(|l| l.key == item.key) {
            debug!(key = %item.key, "legend item rejected");
            return Vec::new();
        }
        self.state.legend.push(item);
        self.touch();
        vec![Action::RenderNeeded]
    }

    /// Replace the legend entry `key`. The new key must stay unique.
    pub fn update_legend_item(&mut self, key: &str, item: LegendItem) -> Vec<Action> {
        if item.key.is_empty() || (item.key != key && self.state.legend.iter().any(|l| l.key == item.key)) {
            debug!(key, new_key = %item.key, "legend update rejected");
            return Vec::new();
        }
        let Some(slot) = self.state.legend.iter_mut().find(|l| l.key == key) else {
            return Vec::new();
        };
        if *slot == item {
            return Vec::new();
        }
        *slot = item;
        self.touch();
        vec![Action::RenderNeeded]
    }

    pub fn remove_legend_item(&mut self, key: &str) -> Vec<Action> {
        let before = self.state.legend.len();
        self.state.legend.retain(|l| l.key != key);
        if self.state.legend.len() == before {
            return Vec::new();
        }
        self.touch();
        vec![Action::RenderNeeded]
    }
}
