#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Group, Node};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn ids(n: usize) -> Vec<NodeId> {
    (0..n).map(|_| uuid::Uuid::new_v4()).collect()
}

fn position_of(positions: &[NodePosition], id: NodeId) -> Point {
    positions.iter().find(|p| p.id == id).map(|p| p.position).unwrap_or_default()
}

// =============================================================
// align
// =============================================================

#[test]
fn align_left_uses_leftmost_edge() {
    let id = ids(2);
    let items = [(id[0], Rect::new(10.0, 0.0, 50.0, 50.0)), (id[1], Rect::new(100.0, 80.0, 30.0, 30.0))];
    let out = align(&items, Alignment::Left);
    assert_eq!(position_of(&out, id[0]), pt(10.0, 0.0));
    assert_eq!(position_of(&out, id[1]), pt(10.0, 80.0));
}

#[test]
fn align_right_and_bottom_use_far_edges() {
    let id = ids(2);
    let items = [(id[0], Rect::new(10.0, 0.0, 50.0, 50.0)), (id[1], Rect::new(100.0, 80.0, 30.0, 30.0))];
    let right = align(&items, Alignment::Right);
    assert_eq!(position_of(&right, id[0]), pt(80.0, 0.0));
    assert_eq!(position_of(&right, id[1]), pt(100.0, 80.0));

    let bottom = align(&items, Alignment::Bottom);
    assert_eq!(position_of(&bottom, id[0]), pt(10.0, 60.0));
    assert_eq!(position_of(&bottom, id[1]), pt(100.0, 80.0));
}

#[test]
fn align_centers_share_bounding_box_center() {
    let id = ids(2);
    let items = [(id[0], Rect::new(0.0, 0.0, 100.0, 20.0)), (id[1], Rect::new(100.0, 80.0, 50.0, 40.0))];
    let cx = align(&items, Alignment::CenterX);
    assert_eq!(position_of(&cx, id[0]).x, 25.0);
    assert_eq!(position_of(&cx, id[1]).x, 50.0);

    let cy = align(&items, Alignment::CenterY);
    assert_eq!(position_of(&cy, id[0]).y, 50.0);
    assert_eq!(position_of(&cy, id[1]).y, 40.0);
}

#[test]
fn align_empty_is_empty() {
    assert!(align(&[], Alignment::Top).is_empty());
}

// =============================================================
// distribute
// =============================================================

#[test]
fn distribute_equalizes_gaps_between_outer_items() {
    let id = ids(3);
    let items = [
        (id[0], Rect::new(0.0, 0.0, 100.0, 10.0)),
        (id[1], Rect::new(400.0, 5.0, 100.0, 10.0)),
        (id[2], Rect::new(120.0, 9.0, 50.0, 10.0)),
    ];
    let out = distribute(&items, Distribution::Horizontal);
    assert_eq!(position_of(&out, id[0]), pt(0.0, 0.0));
    assert_eq!(position_of(&out, id[2]), pt(225.0, 9.0));
    assert_eq!(position_of(&out, id[1]), pt(400.0, 5.0));
}

#[test]
fn distribute_vertical_sorts_by_top() {
    let id = ids(3);
    let items = [
        (id[0], Rect::new(0.0, 300.0, 10.0, 100.0)),
        (id[1], Rect::new(0.0, 0.0, 10.0, 100.0)),
        (id[2], Rect::new(0.0, 250.0, 10.0, 100.0)),
    ];
    let out = distribute(&items, Distribution::Vertical);
    assert_eq!(position_of(&out, id[1]).y, 0.0);
    assert_eq!(position_of(&out, id[2]).y, 150.0);
    assert_eq!(position_of(&out, id[0]).y, 300.0);
}

#[test]
fn distribute_needs_three() {
    let id = ids(2);
    let items = [(id[0], Rect::new(0.0, 0.0, 1.0, 1.0)), (id[1], Rect::new(9.0, 0.0, 1.0, 1.0))];
    assert!(distribute(&items, Distribution::Horizontal).is_empty());
}

// =============================================================
// Engine
// =============================================================

#[test]
fn align_selection_records_undo_point_and_refreshes_groups() {
    let mut engine = EngineCore::new();
    let a = Node::new("text", pt(0.0, 0.0), 100.0, 50.0);
    let b = Node::new("text", pt(300.0, 200.0), 100.0, 50.0);
    let (aid, bid) = (a.id, b.id);
    let group = Group::new("g", [aid, bid]);
    let gid = group.id;
    engine.load_graph(vec![a, b], Vec::new(), vec![group]);
    engine.ui.selected = vec![aid, bid];

    let actions = engine.align_selection(Alignment::Top);
    assert!(actions.iter().any(|a| matches!(a, Action::GroupUpdated(g) if g.id == gid && g.height == 50.0)));
    assert_eq!(engine.doc.node(&bid).map(|n| n.position), Some(pt(300.0, 0.0)));

    engine.undo();
    assert_eq!(engine.doc.node(&bid).map(|n| n.position), Some(pt(300.0, 200.0)));
}

#[test]
fn align_selection_uses_collapsed_height() {
    let mut engine = EngineCore::new();
    let mut a = Node::new("text", pt(0.0, 0.0), 100.0, 300.0);
    a.is_collapsed = true;
    let b = Node::new("text", pt(300.0, 0.0), 100.0, 100.0);
    let (aid, bid) = (a.id, b.id);
    engine.load_graph(vec![a, b], Vec::new(), Vec::new());
    engine.ui.selected = vec![aid, bid];

    engine.align_selection(Alignment::Bottom);
    assert_eq!(engine.doc.node(&aid).map(|n| n.position), Some(pt(0.0, 60.0)));
}

#[test]
fn single_selection_does_nothing() {
    let mut engine = EngineCore::new();
    let a = Node::new("text", pt(0.0, 0.0), 100.0, 50.0);
    let aid = a.id;
    engine.load_graph(vec![a], Vec::new(), Vec::new());
    engine.ui.selected = vec![aid];

    assert!(engine.align_selection(Alignment::Left).is_empty());
    assert!(engine.distribute_selection(Distribution::Horizontal).is_empty());
    assert!(!engine.history.can_undo());
}
