//! End-to-end checks of the editor's contract through the public API only.

use std::collections::HashSet;

use logigramme::arrange::AlignKind;
use logigramme::codec::{self, Diagram};
use logigramme::commands;
use logigramme::connect::ConnectMode;
use logigramme::engine::DiagramEditor;
use logigramme::geom::Point;
use logigramme::guides::{GuideOptions, GuideOrientation, snap_node};
use logigramme::input::Modifiers;
use logigramme::model::{Edge, Graph, Node};
use logigramme::shape::ShapeKind;
use logigramme::sync::{GridLayout, StepRecord, sync_nodes};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn make_node(id: &str, x: f64, y: f64, w: f64, h: f64) -> Node {
    let mut n = Node::new(id, ShapeKind::Rectangle, id, Point::new(x, y));
    n.style.width = Some(w);
    n.style.height = Some(h);
    n
}

fn make_graph() -> Graph {
    let nodes = vec![
        make_node("start", 40.0, 40.0, 72.0, 72.0),
        make_node("check", 280.0, 40.0, 140.0, 90.0),
        make_node("ship", 520.0, 40.0, 180.0, 64.0),
        make_node("reject", 280.0, 240.0, 180.0, 64.0),
    ];
    let edges = vec![
        Edge::new("e1", "start", "check"),
        Edge::new("e2", "check", "ship"),
        Edge::new("e3", "check", "reject"),
        Edge::new("e4", "reject", "start"),
    ];
    Graph::new(nodes, edges)
}

fn make_editor() -> DiagramEditor {
    let mut editor = DiagramEditor::default();
    let diagram = Diagram { entry_node_id: Some("start".into()), graph: make_graph(), legend: Vec::new() };
    editor.load(&codec::encode(&diagram));
    editor
}

// =============================================================
// 1. Round trip
// =============================================================

#[test]
fn decode_of_encode_keeps_nodes_and_edges() {
    init_tracing();
    let mut graph = make_graph();
    graph.set_selection_source(Some("check"));
    let diagram = Diagram { entry_node_id: Some("start".into()), graph: graph.clone(), legend: Vec::new() };

    let (decoded, report) = codec::decode(&codec::encode(&diagram));
    assert!(report.is_clean());
    assert_eq!(decoded.graph, graph.normalized());
    assert_eq!(decoded.entry_node_id.as_deref(), Some("start"));

    let json = codec::encode_value(&diagram).unwrap();
    let (from_json, _) = codec::decode_value(&json).unwrap();
    assert_eq!(from_json.graph, graph.normalized());
}

// =============================================================
// 2. Sync idempotence
// =============================================================

#[test]
fn sync_twice_equals_sync_once() {
    init_tracing();
    let steps: Vec<StepRecord> =
        (0..8).map(|i| StepRecord::new(format!("k{i}"), format!("Step {i}"))).collect();
    let layout = GridLayout::default();
    let once = sync_nodes(&make_graph().nodes, &steps, &layout);
    let twice = sync_nodes(&once.nodes, &steps, &layout);
    assert_eq!(once.nodes, twice.nodes);
    assert!(!twice.changed);
}

// =============================================================
// 3. Cascade delete
// =============================================================

#[test]
fn deleting_a_node_removes_exactly_its_edges() {
    for victim in ["start", "check", "ship", "reject"] {
        let mut graph = make_graph();
        let expected: HashSet<String> =
            graph.edges.iter().filter(|e| e.source == victim || e.target == victim).map(|e| e.id.clone()).collect();
        let survivors: HashSet<String> = graph.edge_ids().difference(&expected).cloned().collect();

        let nodes = HashSet::from([victim.to_string()]);
        let outcome = commands::delete(&mut graph, &nodes, &HashSet::new());
        assert_eq!(outcome.edges.iter().cloned().collect::<HashSet<_>>(), expected, "victim {victim}");
        assert_eq!(graph.edge_ids(), survivors, "victim {victim}");
        assert!(graph.is_consistent());
    }
}

// =============================================================
// 4. Snap correctness
// =============================================================

#[test]
fn left_edges_within_threshold_snap_with_one_vertical_guide() {
    let a = make_node("a", 100.0, 100.0, 120.0, 60.0);
    let b = make_node("b", 106.0, 300.0, 120.0, 60.0);
    let result = snap_node("b", &[a, b], &GuideOptions::default());

    assert_eq!(106.0 + result.dx, 100.0);
    assert_eq!(result.dy, 0.0);
    assert_eq!(result.guides.len(), 1);
    let guide = &result.guides[0];
    assert_eq!(guide.orientation, GuideOrientation::Vertical);
    assert_eq!(guide.position, 100.0);
    assert!(guide.start <= 100.0 && guide.end >= 360.0);
}

// =============================================================
// 5. Duplicate disjointness
// =============================================================

#[test]
fn duplicate_ids_are_fresh_and_edges_stay_inside() {
    let graph = make_graph();
    let selection: HashSet<String> = ["start", "check", "reject"].into_iter().map(String::from).collect();
    let existing: HashSet<String> = graph.node_ids();

    let result = commands::duplicate(&graph, &selection, 20.0, 20.0);
    let new_ids: HashSet<String> = result.node_ids().into_iter().collect();
    assert_eq!(new_ids.len(), 3);
    assert!(new_ids.is_disjoint(&existing));
    assert_eq!(result.edges.len(), 3);
    assert!(result.edges.iter().all(|e| new_ids.contains(&e.source) && new_ids.contains(&e.target)));
}

// =============================================================
// 6. Undo / redo symmetry
// =============================================================

#[test]
fn n_undos_and_n_redos_are_symmetric() {
    init_tracing();
    let mut editor = make_editor();
    let initial = editor.graph().clone();

    editor.select_node("ship", false);
    editor.nudge(10.0, 0.0);
    editor.set_node_label("check", "Valid?");
    editor.connect("ship", "reject");
    editor.set_selection(["start", "check"]);
    editor.align(AlignKind::Left);
    editor.duplicate();
    editor.delete_selection();
    let operations = 6;
    let last = editor.graph().clone();

    for _ in 0..operations {
        assert!(!editor.undo().is_empty());
    }
    assert!(editor.undo().is_empty());
    assert_eq!(editor.graph(), &initial);

    for _ in 0..operations {
        assert!(!editor.redo().is_empty());
    }
    assert!(editor.redo().is_empty());
    assert_eq!(editor.graph(), &last);
}

// =============================================================
// 7. Fan-out without duplicates
// =============================================================

#[test]
fn fanout_clicks_create_two_edges_not_three() {
    let mut editor = DiagramEditor::default();
    let graph = Graph::new(
        vec![
            make_node("s", 0.0, 0.0, 50.0, 50.0),
            make_node("t1", 200.0, 0.0, 50.0, 50.0),
            make_node("t2", 400.0, 0.0, 50.0, 50.0),
        ],
        Vec::new(),
    );
    editor.load(&codec::encode(&Diagram { entry_node_id: None, graph, legend: Vec::new() }));

    editor.set_connect_mode(ConnectMode::Fanout);
    for id in ["s", "t1", "t1", "t2"] {
        editor.click_node(id, Modifiers::default());
    }
    let pairs: Vec<(&str, &str)> =
        editor.graph().edges.iter().map(|e| (e.source.as_str(), e.target.as_str())).collect();
    assert_eq!(pairs, vec![("s", "t1"), ("s", "t2")]);
}

// =============================================================
// 8. Align left
// =============================================================

#[test]
fn align_left_moves_everyone_to_the_minimum() {
    let mut editor = DiagramEditor::default();
    let graph = Graph::new(
        vec![
            make_node("a", 10.0, 0.0, 80.0, 40.0),
            make_node("b", 50.0, 100.0, 120.0, 40.0),
            make_node("c", 30.0, 200.0, 60.0, 40.0),
        ],
        Vec::new(),
    );
    editor.load(&codec::encode(&Diagram { entry_node_id: None, graph, legend: Vec::new() }));
    editor.select_all();
    editor.align(AlignKind::Left);
    assert!(editor.graph().nodes.iter().all(|n| n.position.x == 10.0));
}
