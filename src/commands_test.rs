#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::Point;
use crate::shape::ShapeKind;

fn make_node(id: &str, x: f64, y: f64) -> Node {
    let mut n = Node::new(id, ShapeKind::Rectangle, id, Point::new(x, y));
    n.source_ref = Some(format!("ref-{id}"));
    n
}

fn make_graph() -> Graph {
    Graph::new(
        vec![make_node("a", 0.0, 0.0), make_node("b", 100.0, 0.0), make_node("c", 200.0, 0.0)],
        vec![Edge::new("ab", "a", "b"), Edge::new("bc", "b", "c"), Edge::new("ca", "c", "a")],
    )
}

fn set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| (*s).to_string()).collect()
}

// =============================================================
// copy
// =============================================================

#[test]
fn copy_takes_only_internal_edges() {
    let snap = copy(&make_graph(), &set(&["a", "b"]));
    assert_eq!(snap.nodes.len(), 2);
    assert_eq!(snap.edges.len(), 1);
    assert_eq!(snap.edges[0].id, "ab");
}

#[test]
fn copy_is_independent_of_later_edits() {
    let mut g = make_graph();
    let snap = copy(&g, &set(&["a"]));
    g.node_mut("a").unwrap().label = "changed".into();
    assert_eq!(snap.nodes[0].label, "a");
}

#[test]
fn copy_clears_selection_source_flag() {
    let mut g = make_graph();
    g.set_selection_source(Some("a"));
    let snap = copy(&g, &set(&["a"]));
    assert!(!snap.nodes[0].is_selection_source);
}

#[test]
fn copy_empty_selection_is_empty() {
    assert!(copy(&make_graph(), &HashSet::new()).is_empty());
}

// =============================================================
// paste
// =============================================================

#[test]
fn paste_remaps_ids_and_offsets_positions() {
    let g = make_graph();
    let snap = copy(&g, &set(&["a", "b"]));
    let out = paste(&snap, 20.0, 20.0, &g.node_ids());

    assert_eq!(out.nodes.len(), 2);
    let new_a = out.id_map.get("a").unwrap();
    let pasted_a = out.nodes.iter().find(|n| &n.id == new_a).unwrap();
    assert_eq!(pasted_a.position, Point::new(20.0, 20.0));
    assert!(pasted_a.source_ref.is_none());

    assert_eq!(out.edges.len(), 1);
    assert_eq!(&out.edges[0].source, new_a);
    assert_eq!(&out.edges[0].target, out.id_map.get("b").unwrap());
    assert_ne!(out.edges[0].id, "ab");
}

#[test]
fn paste_drops_edges_leaving_the_snapshot() {
    let g = make_graph();
    let mut snap = copy(&g, &set(&["a"]));
    snap.edges.push(Edge::new("stray", "a", "zzz"));
    let out = paste(&snap, 0.0, 0.0, &g.node_ids());
    assert!(out.edges.is_empty());
}

#[test]
fn paste_twice_gives_distinct_ids() {
    let g = make_graph();
    let snap = copy(&g, &set(&["a"]));
    let first = paste(&snap, 20.0, 20.0, &g.node_ids());
    let mut taken = g.node_ids();
    taken.extend(first.node_ids());
    let second = paste(&snap, 40.0, 40.0, &taken);
    assert_ne!(first.nodes[0].id, second.nodes[0].id);
}

#[test]
fn paste_keeps_edge_styling() {
    let mut g = make_graph();
    g.edge_mut("ab").unwrap().label = Some("yes".into());
    let snap = copy(&g, &set(&["a", "b"]));
    let out = paste(&snap, 0.0, 0.0, &g.node_ids());
    assert_eq!(out.edges[0].label.as_deref(), Some("yes"));
}

// =============================================================
// duplicate
// =============================================================

#[test]
fn duplicate_ids_are_disjoint_from_existing() {
    let g = make_graph();
    let out = duplicate(&g, &set(&["a", "b", "c"]), 20.0, 20.0);
    let existing = g.node_ids();
    let new_ids: HashSet<String> = out.node_ids().into_iter().collect();
    assert!(new_ids.is_disjoint(&existing));
    assert_eq!(out.edges.len(), 3);
    for e in &out.edges {
        assert!(new_ids.contains(&e.source));
        assert!(new_ids.contains(&e.target));
    }
}

// =============================================================
// delete
// =============================================================

#[test]
fn delete_node_cascades_touching_edges_only() {
    let mut g = make_graph();
    let out = delete(&mut g, &set(&["b"]), &HashSet::new());
    assert_eq!(out.nodes, vec!["b".to_string()]);
    assert_eq!(out.edges.len(), 2);
    assert_eq!(g.edges.len(), 1);
    assert_eq!(g.edges[0].id, "ca");
    assert!(g.is_consistent());
}

#[test]
fn delete_selected_edge_keeps_nodes() {
    let mut g = make_graph();
    let out = delete(&mut g, &HashSet::new(), &set(&["bc"]));
    assert!(out.nodes.is_empty());
    assert_eq!(out.edges, vec!["bc".to_string()]);
    assert_eq!(g.nodes.len(), 3);
}

#[test]
fn delete_node_with_its_selected_edge_reports_each_edge_once() {
    let mut g = make_graph();
    let out = delete(&mut g, &set(&["b"]), &set(&["ab"]));
    assert_eq!(out.edges, vec!["ab".to_string(), "bc".to_string()]);
    assert_eq!(g.edges.len(), 1);
    assert!(g.is_consistent());
}

#[test]
fn delete_unknown_ids_is_noop() {
    let mut g = make_graph();
    let out = delete(&mut g, &set(&["zzz"]), &set(&["yyy"]));
    assert!(out.is_empty());
    assert_eq!(g, make_graph());
}
