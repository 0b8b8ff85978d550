#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::Point;
use crate::shape::ShapeKind;

fn make_node(id: &str, x: f64, y: f64, w: f64, h: f64) -> Node {
    let mut n = Node::new(id, ShapeKind::Rectangle, id, Point::new(x, y));
    n.style.width = Some(w);
    n.style.height = Some(h);
    n
}

fn all(nodes: &[Node]) -> HashSet<NodeId> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

// =============================================================
// align
// =============================================================

#[test]
fn align_left_uses_minimum_left() {
    let mut nodes = vec![
        make_node("a", 10.0, 0.0, 100.0, 50.0),
        make_node("b", 50.0, 100.0, 60.0, 50.0),
        make_node("c", 30.0, 200.0, 80.0, 50.0),
    ];
    let sel = all(&nodes);
    let moved = align(&mut nodes, &sel, AlignKind::Left, None);
    assert_eq!(moved, 2);
    assert!(nodes.iter().all(|n| n.position.x == 10.0));
}

#[test]
fn align_right_uses_maximum_right() {
    let mut nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 50.0, 100.0, 20.0, 50.0)];
    let sel = all(&nodes);
    align(&mut nodes, &sel, AlignKind::Right, None);
    assert!(nodes.iter().all(|n| n.bounds().right() == 100.0));
}

#[test]
fn align_center_uses_average_center() {
    let mut nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 100.0, 100.0, 20.0, 50.0)];
    // centers 50 and 110 -> 80
    let sel = all(&nodes);
    align(&mut nodes, &sel, AlignKind::Center, None);
    assert!(nodes.iter().all(|n| n.bounds().center_x() == 80.0));
}

#[test]
fn align_vertical_variants() {
    let base = vec![make_node("a", 0.0, 10.0, 50.0, 40.0), make_node("b", 100.0, 30.0, 50.0, 20.0)];
    let sel = all(&base);

    let mut top = base.clone();
    align(&mut top, &sel, AlignKind::Top, None);
    assert!(top.iter().all(|n| n.position.y == 10.0));

    let mut bottom = base.clone();
    align(&mut bottom, &sel, AlignKind::Bottom, None);
    assert!(bottom.iter().all(|n| n.bounds().bottom() == 50.0));

    let mut middle = base;
    align(&mut middle, &sel, AlignKind::Middle, None);
    assert!(middle.iter().all(|n| n.bounds().center_y() == 35.0));
}

#[test]
fn align_requires_two_nodes() {
    let mut nodes = vec![make_node("a", 10.0, 0.0, 10.0, 10.0), make_node("b", 50.0, 0.0, 10.0, 10.0)];
    let sel: HashSet<NodeId> = HashSet::from(["a".to_string()]);
    assert_eq!(align(&mut nodes, &sel, AlignKind::Left, None), 0);
    assert_eq!(nodes[1].position.x, 50.0);
}

#[test]
fn align_ignores_unselected_nodes() {
    let mut nodes = vec![
        make_node("a", 10.0, 0.0, 10.0, 10.0),
        make_node("b", 50.0, 0.0, 10.0, 10.0),
        make_node("c", 0.0, 0.0, 10.0, 10.0),
    ];
    let sel: HashSet<NodeId> = HashSet::from(["a".to_string(), "b".to_string()]);
    align(&mut nodes, &sel, AlignKind::Left, None);
    assert_eq!(nodes[1].position.x, 10.0);
    assert_eq!(nodes[2].position.x, 0.0);
}

#[test]
fn align_snaps_governing_coordinate_to_grid() {
    let mut nodes = vec![make_node("a", 13.0, 0.0, 10.0, 10.0), make_node("b", 50.0, 0.0, 10.0, 10.0)];
    let sel = all(&nodes);
    align(&mut nodes, &sel, AlignKind::Left, Some(10.0));
    assert!(nodes.iter().all(|n| n.position.x == 10.0));
}

#[test]
fn align_already_aligned_moves_nothing() {
    let mut nodes = vec![make_node("a", 10.0, 0.0, 10.0, 10.0), make_node("b", 10.0, 50.0, 10.0, 10.0)];
    let sel = all(&nodes);
    assert_eq!(align(&mut nodes, &sel, AlignKind::Left, None), 0);
}

#[test]
fn align_reasons_are_tagged() {
    assert_eq!(AlignKind::Left.reason(), "align-left");
    assert_eq!(AlignKind::Middle.reason(), "align-middle");
}

// =============================================================
// distribute
// =============================================================

#[test]
fn distribute_horizontal_equalizes_center_spacing() {
    let mut nodes = vec![
        make_node("a", 0.0, 0.0, 20.0, 20.0),
        make_node("b", 30.0, 0.0, 20.0, 20.0),
        make_node("c", 200.0, 0.0, 20.0, 20.0),
        make_node("d", 40.0, 0.0, 20.0, 20.0),
    ];
    let sel = all(&nodes);
    let moved = distribute(&mut nodes, &sel, DistributeAxis::Horizontal, None);
    assert_eq!(moved, 2);

    let mut centers: Vec<f64> = nodes.iter().map(|n| n.bounds().center_x()).collect();
    centers.sort_by(f64::total_cmp);
    let expected = [10.0, 10.0 + 200.0 / 3.0, 10.0 + 400.0 / 3.0, 210.0];
    for (got, want) in centers.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{got} != {want}");
    }
    // extremes untouched
    assert_eq!(nodes[0].position.x, 0.0);
    assert_eq!(nodes[2].position.x, 200.0);
}

#[test]
fn distribute_vertical_uses_centers() {
    let mut nodes = vec![
        make_node("a", 0.0, 0.0, 10.0, 10.0),
        make_node("b", 0.0, 10.0, 10.0, 30.0),
        make_node("c", 0.0, 100.0, 10.0, 10.0),
    ];
    let sel = all(&nodes);
    distribute(&mut nodes, &sel, DistributeAxis::Vertical, None);
    // centers 5 and 105 -> middle center 55, height 30 -> y = 40
    assert_eq!(nodes[1].position.y, 40.0);
}

#[test]
fn distribute_requires_three_nodes() {
    let mut nodes = vec![make_node("a", 0.0, 0.0, 10.0, 10.0), make_node("b", 7.0, 0.0, 10.0, 10.0)];
    let sel = all(&nodes);
    assert_eq!(distribute(&mut nodes, &sel, DistributeAxis::Horizontal, None), 0);
}

#[test]
fn distribute_with_grid_snaps_interior_positions() {
    let mut nodes = vec![
        make_node("a", 0.0, 0.0, 10.0, 10.0),
        make_node("b", 3.0, 0.0, 10.0, 10.0),
        make_node("c", 97.0, 0.0, 10.0, 10.0),
    ];
    let sel = all(&nodes);
    distribute(&mut nodes, &sel, DistributeAxis::Horizontal, Some(10.0));
    // ideal x = 48.5 -> 50
    assert_eq!(nodes[1].position.x, 50.0);
}
