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

fn opts() -> GuideOptions {
    GuideOptions::default()
}

// =============================================================
// Single axis
// =============================================================

#[test]
fn left_edge_within_threshold_snaps_onto_target_left() {
    let nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 5.0, 200.0, 100.0, 50.0)];
    let snap = snap_node("b", &nodes, &opts());
    assert_eq!(snap.dx, -5.0);
    assert_eq!(snap.dy, 0.0);
    assert_eq!(snap.guides.len(), 1);

    let g = &snap.guides[0];
    assert_eq!(g.orientation, GuideOrientation::Vertical);
    assert_eq!(g.position, 0.0);
    assert!(g.start <= 0.0);
    assert!(g.end >= 250.0);
    assert_eq!(g.aligned_with, vec!["a".to_string()]);
}

#[test]
fn nothing_under_threshold_yields_zero_delta_and_no_guide() {
    let nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 300.0, 300.0, 40.0, 40.0)];
    let snap = snap_node("b", &nodes, &opts());
    assert_eq!(snap.dx, 0.0);
    assert_eq!(snap.dy, 0.0);
    assert!(snap.is_empty());
}

#[test]
fn delta_equal_to_threshold_does_not_snap() {
    let nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 8.0, 300.0, 40.0, 40.0)];
    let snap = snap_node("b", &nodes, &opts());
    assert_eq!(snap.dx, 0.0);
}

#[test]
fn smallest_delta_wins_across_targets() {
    let nodes = vec![
        make_node("far", 0.0, 0.0, 50.0, 50.0),
        make_node("near", 7.0, 100.0, 50.0, 50.0),
        make_node("drag", 6.0, 400.0, 50.0, 50.0),
    ];
    let snap = snap_node("drag", &nodes, &opts());
    assert_eq!(snap.dx, 1.0);
    assert_eq!(snap.guides[0].position, 7.0);
    assert_eq!(snap.guides[0].aligned_with, vec!["near".to_string()]);
}

#[test]
fn center_to_center_alignment() {
    let nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 33.0, 300.0, 40.0, 40.0)];
    // a center x = 50, b center x = 53
    let snap = snap_node("b", &nodes, &opts());
    assert_eq!(snap.dx, -3.0);
    assert_eq!(snap.guides[0].position, 50.0);
}

#[test]
fn opposite_edges_align() {
    // b's left (104) near a's right (100)
    let nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 104.0, 300.0, 30.0, 30.0)];
    let snap = snap_node("b", &nodes, &opts());
    assert_eq!(snap.dx, -4.0);
    assert_eq!(snap.guides[0].position, 100.0);
}

#[test]
fn top_to_bottom_alignment_gives_horizontal_guide() {
    let nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 400.0, 53.0, 30.0, 30.0)];
    let snap = snap_node("b", &nodes, &opts());
    assert_eq!(snap.dy, -3.0);
    assert_eq!(snap.guides.len(), 1);
    let g = &snap.guides[0];
    assert_eq!(g.orientation, GuideOrientation::Horizontal);
    assert_eq!(g.position, 50.0);
    assert!(g.start <= 0.0);
    assert!(g.end >= 430.0);
}

// =============================================================
// Both axes
// =============================================================

#[test]
fn both_axes_snap_independently() {
    let nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 3.0, 52.0, 100.0, 50.0)];
    let snap = snap_node("b", &nodes, &opts());
    assert_eq!(snap.dx, -3.0);
    assert_eq!(snap.dy, -2.0);
    assert_eq!(snap.guides.len(), 2);
}

#[test]
fn both_axes_guides_use_the_fully_snapped_box() {
    let nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 3.0, 52.0, 100.0, 50.0)];
    let snap = snap_node("b", &nodes, &opts());
    // snapped b sits at (0, 50, 100x50)
    let vertical = &snap.guides[0];
    assert_eq!(vertical.orientation, GuideOrientation::Vertical);
    assert_eq!(vertical.start, -GUIDE_PADDING);
    assert_eq!(vertical.end, 100.0 + GUIDE_PADDING);
    let horizontal = &snap.guides[1];
    assert_eq!(horizontal.orientation, GuideOrientation::Horizontal);
    assert_eq!(horizontal.start, -GUIDE_PADDING);
    assert_eq!(horizontal.end, 100.0 + GUIDE_PADDING);
}

#[test]
fn guide_spans_every_node_on_the_cross_axis() {
    let nodes = vec![
        make_node("a", 0.0, 0.0, 100.0, 50.0),
        make_node("far", 500.0, 1000.0, 40.0, 40.0),
        make_node("b", 5.0, 200.0, 100.0, 50.0),
    ];
    let snap = snap_node("b", &nodes, &opts());
    assert_eq!(snap.guides.len(), 1);
    let g = &snap.guides[0];
    assert_eq!(g.aligned_with, vec!["a".to_string()]);
    assert_eq!(g.start, -GUIDE_PADDING);
    assert_eq!(g.end, 1040.0 + GUIDE_PADDING);
}

#[test]
fn guide_lists_every_coinciding_target() {
    let nodes = vec![
        make_node("a", 0.0, 0.0, 100.0, 50.0),
        make_node("c", 0.0, 100.0, 60.0, 50.0),
        make_node("b", 4.0, 300.0, 80.0, 50.0),
    ];
    let snap = snap_node("b", &nodes, &opts());
    assert_eq!(snap.dx, -4.0);
    let g = &snap.guides[0];
    assert_eq!(g.aligned_with, vec!["a".to_string(), "c".to_string()]);
    assert_eq!(g.start, -GUIDE_PADDING);
    assert_eq!(g.end, 350.0 + GUIDE_PADDING);
}

#[test]
fn unknown_node_gives_empty_result() {
    let nodes = vec![make_node("a", 0.0, 0.0, 10.0, 10.0)];
    assert_eq!(snap_node("zzz", &nodes, &opts()), SnapResult::default());
}

#[test]
fn custom_threshold_is_respected() {
    let nodes = vec![make_node("a", 0.0, 0.0, 100.0, 50.0), make_node("b", 12.0, 300.0, 40.0, 40.0)];
    let wide = GuideOptions { threshold: 20.0, ..opts() };
    assert_eq!(snap_node("b", &nodes, &wide).dx, -12.0);
}

#[test]
fn snap_bounds_with_explicit_targets() {
    let targets = [Target { id: "t", bounds: Bounds::new(0.0, 0.0, 50.0, 50.0) }];
    let snap = snap_bounds(&Bounds::new(2.0, 200.0, 50.0, 50.0), &targets, &opts());
    assert_eq!(snap.dx, -2.0);
}
