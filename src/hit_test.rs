#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::DockMode;
use crate::kinds::IMAGE_INPUT_2;

fn node_at_rect(x: f64, y: f64, w: f64, h: f64) -> Node {
    Node::new("text", Point::new(x, y), w, h)
}

// =============================================================
// Rect
// =============================================================

#[test]
fn rect_from_corners_normalizes() {
    let r = Rect::from_corners(Point::new(50.0, 80.0), Point::new(10.0, 20.0));
    assert_eq!(r, Rect::new(10.0, 20.0, 40.0, 60.0));
}

#[test]
fn rect_contains_is_inclusive() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains(Point::new(0.0, 0.0)));
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(!r.contains(Point::new(10.1, 5.0)));
}

#[test]
fn rect_intersects_requires_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.intersects(&Rect::new(20.0, 20.0, 1.0, 1.0)));
}

#[test]
fn rect_shrink_by_fraction_trims_each_side() {
    let r = Rect::new(0.0, 0.0, 100.0, 50.0).shrink_by_fraction(0.05);
    assert_eq!(r, Rect::new(5.0, 2.5, 90.0, 45.0));
}

#[test]
fn rect_union_all_empty_is_none() {
    assert!(Rect::union_all(Vec::new()).is_none());
}

#[test]
fn rect_union_all_wraps_inputs() {
    let r = Rect::union_all([Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(50.0, -20.0, 5.0, 5.0)]);
    assert_eq!(r, Some(Rect::new(0.0, -20.0, 55.0, 30.0)));
}

// =============================================================
// Effective boxes
// =============================================================

#[test]
fn effective_rect_plain_node() {
    let n = node_at_rect(10.0, 20.0, 200.0, 150.0);
    assert_eq!(effective_rect(&n), Rect::new(10.0, 20.0, 200.0, 150.0));
}

#[test]
fn effective_rect_collapsed_node_uses_collapsed_height() {
    let mut n = node_at_rect(10.0, 20.0, 200.0, 150.0);
    n.is_collapsed = true;
    assert_eq!(effective_rect(&n), Rect::new(10.0, 20.0, 200.0, COLLAPSED_HEIGHT));
}

#[test]
fn effective_rect_docked_node_uses_proxy() {
    let mut n = node_at_rect(10.0, 20.0, 200.0, 150.0);
    n.is_collapsed = true;
    n.dock_state = Some(DockMode::Left);
    assert_eq!(effective_rect(&n), Rect::new(10.0, 20.0, DOCKED_PROXY_SIZE, DOCKED_PROXY_SIZE));
}

#[test]
fn node_at_prefers_topmost() {
    let mut doc = GraphDoc::new();
    let below = node_at_rect(0.0, 0.0, 100.0, 100.0);
    let above = node_at_rect(50.0, 50.0, 100.0, 100.0);
    let above_id = above.id;
    doc.insert_node(below);
    doc.insert_node(above);
    assert_eq!(node_at(&doc, Point::new(75.0, 75.0), 0.0), Some(above_id));
}

#[test]
fn node_at_respects_tolerance() {
    let mut doc = GraphDoc::new();
    let n = node_at_rect(0.0, 0.0, 100.0, 100.0);
    let id = n.id;
    doc.insert_node(n);
    assert_eq!(node_at(&doc, Point::new(105.0, 50.0), 0.0), None);
    assert_eq!(node_at(&doc, Point::new(105.0, 50.0), 10.0), Some(id));
}

// =============================================================
// Connection geometry
// =============================================================

#[test]
fn anchors_sit_on_vertical_middle() {
    let n = node_at_rect(0.0, 0.0, 100.0, 50.0);
    assert_eq!(output_anchor(&n), Point::new(100.0, 25.0));
    assert_eq!(NodeKinds::with_defaults().input_anchor(&n, None), Point::new(0.0, 25.0));
}

#[test]
fn distance_to_segment_projects_onto_segment() {
    let d = distance_to_segment(Point::new(5.0, 3.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert!((d - 3.0).abs() < 1e-9);
    let d = distance_to_segment(Point::new(-4.0, 3.0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert!((d - 5.0).abs() < 1e-9);
}

#[test]
fn distance_to_segment_degenerate_segment() {
    let d = distance_to_segment(Point::new(3.0, 4.0), Point::ZERO, Point::ZERO);
    assert!((d - 5.0).abs() < 1e-9);
}

#[test]
fn curve_points_start_and_end_at_anchors() {
    let pts = curve_points(Point::new(0.0, 0.0), Point::new(300.0, 100.0));
    assert_eq!(pts.len(), CURVE_SAMPLES + 1);
    assert_eq!(pts[0], Point::new(0.0, 0.0));
    let last = pts[CURVE_SAMPLES];
    assert!((last.x - 300.0).abs() < 1e-9 && (last.y - 100.0).abs() < 1e-9);
}

#[test]
fn straight_connection_hit_on_its_line() {
    let d = distance_to_curve(Point::new(250.0, 25.0), Point::new(100.0, 25.0), Point::new(400.0, 25.0));
    assert!(d < 1e-9);
}

#[test]
fn connection_near_skips_connections_touching_excluded_node() {
    let mut doc = GraphDoc::new();
    let a = node_at_rect(0.0, 0.0, 100.0, 50.0);
    let b = node_at_rect(400.0, 0.0, 100.0, 50.0);
    let (a_id, b_id) = (a.id, b.id);
    doc.insert_node(a);
    doc.insert_node(b);
    let conn = Connection::new(a_id, None, b_id, None);
    let conn_id = conn.id;
    doc.add_connection(conn);

    let kinds = NodeKinds::with_defaults();
    let p = Point::new(250.0, 30.0);
    assert_eq!(connection_near(&doc, &kinds, p, 10.0, None), Some(conn_id));
    assert_eq!(connection_near(&doc, &kinds, p, 10.0, Some(b_id)), None);
    assert_eq!(connection_near(&doc, &kinds, Point::new(250.0, 200.0), 10.0, None), None);
}

#[test]
fn connection_distance_none_for_missing_endpoint() {
    let doc = GraphDoc::new();
    let conn = Connection::new(uuid::Uuid::new_v4(), None, uuid::Uuid::new_v4(), None);
    assert!(connection_distance(&doc, &NodeKinds::with_defaults(), &conn, Point::ZERO).is_none());
}

#[test]
fn connection_path_ends_at_its_input_handle() {
    let mut doc = GraphDoc::new();
    let kinds = NodeKinds::with_defaults();
    let source = node_at_rect(0.0, 0.0, 100.0, 200.0);
    let editor = Node::new("image-editor", Point::new(400.0, 0.0), 240.0, 200.0);
    let (source_id, editor_id) = (source.id, editor.id);
    doc.insert_node(source);
    doc.insert_node(editor);
    let lower = Connection::new(source_id, None, editor_id, Some(IMAGE_INPUT_2.to_owned()));

    // Output anchor (100, 100); the lower input sits at (400, 150).
    let near_end = Point::new(395.0, 150.0);
    assert!(connection_distance(&doc, &kinds, &lower, near_end).is_some_and(|d| d < 10.0));
    assert!(connection_distance(&doc, &kinds, &lower, Point::new(395.0, 50.0)).is_some_and(|d| d > 40.0));
}
