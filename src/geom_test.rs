#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Point
// =============================================================

#[test]
fn point_offset_adds_components() {
    let p = Point::new(10.0, 20.0).offset(5.0, -5.0);
    assert_eq!(p, Point::new(15.0, 15.0));
}

#[test]
fn point_distance_is_euclidean() {
    assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn bounds_edges_and_centers() {
    let b = Bounds::new(10.0, 20.0, 100.0, 40.0);
    assert_eq!(b.left(), 10.0);
    assert_eq!(b.right(), 110.0);
    assert_eq!(b.top(), 20.0);
    assert_eq!(b.bottom(), 60.0);
    assert_eq!(b.center_x(), 60.0);
    assert_eq!(b.center_y(), 40.0);
}

#[test]
fn bounds_negative_size_clamped_to_zero() {
    let b = Bounds::new(0.0, 0.0, -5.0, -1.0);
    assert_eq!(b.width, 0.0);
    assert_eq!(b.height, 0.0);
}

#[test]
fn bounds_union_covers_both() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b = Bounds::new(20.0, -5.0, 10.0, 10.0);
    let u = a.union(&b);
    assert_eq!(u, Bounds::new(0.0, -5.0, 30.0, 15.0));
}

#[test]
fn bounds_union_all_empty_is_none() {
    let empty: Vec<Bounds> = Vec::new();
    assert!(Bounds::union_all(&empty).is_none());
}

#[test]
fn bounds_padded_grows_every_side() {
    let b = Bounds::new(10.0, 10.0, 10.0, 10.0).padded(5.0);
    assert_eq!(b, Bounds::new(5.0, 5.0, 20.0, 20.0));
}

#[test]
fn bounds_contains_is_inclusive() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.contains(Point::new(10.0, 10.0)));
    assert!(!b.contains(Point::new(10.1, 5.0)));
}

// =============================================================
// Helpers
// =============================================================

#[test]
fn segment_distance_projects_onto_segment() {
    let d = distance_to_segment(Point::new(5.0, 3.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert_eq!(d, 3.0);
}

#[test]
fn segment_distance_clamps_to_endpoint() {
    let d = distance_to_segment(Point::new(13.0, 4.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert_eq!(d, 5.0);
}

#[test]
fn snap_to_grid_rounds_to_unit() {
    assert_eq!(snap_to_grid(23.0, Some(10.0)), 20.0);
    assert_eq!(snap_to_grid(26.0, Some(10.0)), 30.0);
    assert_eq!(snap_to_grid(23.0, None), 23.0);
    assert_eq!(snap_to_grid(23.0, Some(0.0)), 23.0);
}
